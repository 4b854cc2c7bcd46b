use crate::report::model::TestCaseRecord;
use axum::body::Bytes;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const TEST_TYPES: [&str; 7] = [
    "Comprehensive (All Types)",
    "Functional Testing",
    "UI/UX Testing",
    "Integration Testing",
    "Performance Testing",
    "Security Testing",
    "Accessibility Testing",
];

pub const DEFAULT_APP_CONTEXT: &str = "General Android application";

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

pub const DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "docx", "txt", "md"];

#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Image,
    Document,
    Combined,
}

impl InputMode {
    pub fn uses_images(&self) -> bool {
        matches!(self, InputMode::Image | InputMode::Combined)
    }

    pub fn uses_document(&self) -> bool {
        matches!(self, InputMode::Document | InputMode::Combined)
    }
}

impl Display for InputMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InputMode::Image => { write!(f, "image") }
            InputMode::Document => { write!(f, "document") }
            InputMode::Combined => { write!(f, "combined") }
        }
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(InputMode::Image),
            "document" => Ok(InputMode::Document),
            "combined" => Ok(InputMode::Combined),
            _ => Err(format!("Invalid input mode: {}", s)),
        }
    }
}

/// An uploaded screenshot. The fields are read by `ReportGenerator`
/// implementations when they encode the request.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl ImageAttachment {
    pub fn new(file_name: String, data: Bytes) -> Self {
        let mime_type = mime_type_for(&file_name).to_string();
        ImageAttachment {
            file_name,
            mime_type,
            data,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentAttachment {
    pub file_name: String,
    pub content: String,
}

#[derive(Clone, Debug, Builder)]
#[builder(on(String, into))]
pub struct GenerationRequest {
    #[builder(default = TEST_TYPES[0].to_string())]
    pub test_type: String,
    #[builder(default)]
    pub app_context: String,
    #[builder(default)]
    pub input_mode: InputMode,
    pub api_key: Option<String>,
    #[builder(default)]
    pub images: Vec<ImageAttachment>,
    pub document: Option<DocumentAttachment>,
}

impl GenerationRequest {
    /// Images actually sent for the selected mode.
    pub fn active_images(&self) -> &[ImageAttachment] {
        if self.input_mode.uses_images() {
            &self.images
        } else {
            &[]
        }
    }

    /// Document text actually sent for the selected mode.
    pub fn active_document(&self) -> Option<&DocumentAttachment> {
        self.document.as_ref().filter(|_| self.input_mode.uses_document())
    }

    pub fn app_context_or_default(&self) -> &str {
        if self.app_context.trim().is_empty() {
            DEFAULT_APP_CONTEXT
        } else {
            &self.app_context
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GenerationResult {
    pub id: String,
    pub report: String,
    pub test_cases: Vec<TestCaseRecord>,
    pub test_case_count: usize,
    pub image_count: usize,
    pub character_count: usize,
    pub generated_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PromptPreview {
    pub prompt: String,
}

pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

fn mime_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_str() {
        "png" => { "image/png" }
        "jpg" | "jpeg" => { "image/jpeg" }
        "gif" => { "image/gif" }
        "bmp" => { "image/bmp" }
        _ => { "application/octet-stream" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_mode_parsing() {
        assert_eq!("Combined".parse::<InputMode>(), Ok(InputMode::Combined));
        assert_eq!(" image ".parse::<InputMode>(), Ok(InputMode::Image));
        assert!("video".parse::<InputMode>().is_err());
    }

    #[test]
    fn document_mode_ignores_images() {
        let request = GenerationRequest::builder()
            .input_mode(InputMode::Document)
            .images(vec![ImageAttachment::new("home.png".to_string(), Bytes::from_static(b"png"))])
            .document(DocumentAttachment {
                file_name: "requirements.md".to_string(),
                content: "Login requirements".to_string(),
            })
            .build();
        assert!(request.active_images().is_empty());
        assert_eq!(request.active_document().map(|d| d.content.as_str()), Some("Login requirements"));
    }

    #[test]
    fn image_mode_ignores_document() {
        let request = GenerationRequest::builder()
            .input_mode(InputMode::Image)
            .document(DocumentAttachment {
                file_name: "requirements.txt".to_string(),
                content: "ignored".to_string(),
            })
            .build();
        assert!(request.active_document().is_none());
        assert_eq!(request.app_context_or_default(), DEFAULT_APP_CONTEXT);
    }

    #[test]
    fn image_mime_types() {
        assert_eq!(ImageAttachment::new("A.JPG".to_string(), Bytes::new()).mime_type, "image/jpeg");
        assert_eq!(ImageAttachment::new("noext".to_string(), Bytes::new()).mime_type, "application/octet-stream");
    }
}
