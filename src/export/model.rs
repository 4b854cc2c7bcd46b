use crate::generation::model::InputMode;
use crate::report::model::TestCaseRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Debug)]
pub enum ExportFormat {
    Excel,
    Csv,
    Markdown,
    Text,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => { "xlsx" }
            ExportFormat::Csv => { "csv" }
            ExportFormat::Markdown => { "md" }
            ExportFormat::Text => { "txt" }
            ExportFormat::Json => { "json" }
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Excel => { "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" }
            ExportFormat::Csv => { "text/csv; charset=utf-8" }
            ExportFormat::Markdown => { "text/markdown; charset=utf-8" }
            ExportFormat::Text => { "text/plain; charset=utf-8" }
            ExportFormat::Json => { "application/json" }
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "txt" | "text" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unsupported export format: {}", s)),
        }
    }
}

/// Where the report came from. Only the JSON export carries it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ExportMetadata {
    pub test_type: String,
    pub app_context: String,
    pub input_mode: Option<InputMode>,
    pub image_sources: Vec<String>,
    pub document_source: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ExportRequest {
    pub content: String,
    #[serde(default)]
    pub metadata: ExportMetadata,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExportDocument {
    pub generated_at: String,
    pub test_type: String,
    pub app_context: String,
    pub input_mode: Option<InputMode>,
    pub image_sources: Vec<String>,
    pub document_source: Option<String>,
    pub test_cases_raw: String,
    pub test_case_count: usize,
    pub test_cases: Vec<TestCaseRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}
