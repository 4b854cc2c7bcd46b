use crate::export::model::{ExportDocument, ExportFormat, ExportMetadata, ExportRequest, ExportedFile};
use crate::export::workbook::write_workbook;
use crate::report::model::TestCaseRecord;
use crate::report::parser::parse_test_cases;
use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

pub const SPREADSHEET_HEADERS: [&str; 9] = [
    "TC ID",
    "Test Case Name",
    "Priority",
    "Type",
    "Preconditions",
    "Test Steps",
    "Expected Results",
    "Test Data",
    "Automation Notes",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,
    #[error("spreadsheet error: {0}")]
    Csv(#[from] csv::Error),
    #[error("workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("spreadsheet buffer error: {0}")]
    Buffer(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn export_report(
    request: &ExportRequest,
    format: ExportFormat,
    now: Timestamp,
) -> Result<ExportedFile, ExportError> {
    if request.content.trim().is_empty() {
        return Err(ExportError::Empty);
    }
    let body = match format {
        ExportFormat::Excel => write_workbook(&parse_test_cases(&request.content))?,
        ExportFormat::Csv => write_csv(&parse_test_cases(&request.content))?,
        ExportFormat::Json => write_json(&request.content, &request.metadata, now)?,
        ExportFormat::Markdown | ExportFormat::Text => request.content.clone().into_bytes(),
    };
    let file_name = format!(
        "android_test_cases_{}.{}",
        now.strftime("%Y%m%d_%H%M%S"),
        format.extension()
    );
    info!("exported {} ({} bytes)", file_name, body.len());
    Ok(ExportedFile {
        file_name,
        content_type: format.content_type(),
        body,
    })
}

pub fn write_csv(test_cases: &[TestCaseRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(SPREADSHEET_HEADERS)?;
    for case in test_cases {
        writer.write_record(case.columns())?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))
}

fn write_json(content: &str, metadata: &ExportMetadata, now: Timestamp) -> Result<Vec<u8>, ExportError> {
    let test_cases = parse_test_cases(content);
    let document = ExportDocument {
        generated_at: now.strftime("%Y-%m-%dT%H:%M:%SZ").to_string(),
        test_type: metadata.test_type.clone(),
        app_context: metadata.app_context.clone(),
        input_mode: metadata.input_mode,
        image_sources: metadata.image_sources.clone(),
        document_source: metadata.document_source.clone(),
        test_cases_raw: content.to_string(),
        test_case_count: test_cases.len(),
        test_cases,
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}
