use crate::generation::model::extension_of;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    #[error("unsupported document type '{0}'")]
    Unsupported(String),
    #[error("document is not valid UTF-8")]
    Encoding,
    #[error("could not read PDF: {0}")]
    Pdf(String),
    #[error("could not read DOCX: {0}")]
    Docx(String),
}

/// Pulls the plain text out of an uploaded requirements document.
pub fn extract_document_text(file_name: &str, data: &[u8]) -> Result<String, DocumentError> {
    let extension = extension_of(file_name);
    let text = match extension.as_str() {
        "pdf" => pdf_text(data)?,
        "docx" => docx_text(data)?,
        "txt" | "md" => String::from_utf8(data.to_vec()).map_err(|_| DocumentError::Encoding)?,
        _ => return Err(DocumentError::Unsupported(extension)),
    };
    debug!("extracted {} characters from {}", text.len(), file_name);
    Ok(text)
}

fn pdf_text(data: &[u8]) -> Result<String, DocumentError> {
    let text = pdf_extract::extract_text_from_mem(data).map_err(|err| DocumentError::Pdf(err.to_string()))?;
    Ok(text.trim().to_string())
}

// Paragraph text only, empty paragraphs skipped.
fn docx_text(data: &[u8]) -> Result<String, DocumentError> {
    let docx = docx_rs::read_docx(data).map_err(|err| DocumentError::Docx(err.to_string()))?;
    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(
                paragraph
                    .children
                    .iter()
                    .filter_map(|item| match item {
                        ParagraphChild::Run(run) => Some(run_text(&run.children)),
                        _ => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect();
    Ok(paragraphs.join("\n"))
}

fn run_text(children: &[RunChild]) -> String {
    children
        .iter()
        .filter_map(|child| match child {
            RunChild::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::Cursor;

    pub(crate) fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            let mut paragraph = Paragraph::new();
            if !text.is_empty() {
                paragraph = paragraph.add_run(Run::new().add_text(*text));
            }
            docx = docx.add_paragraph(paragraph);
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    pub(crate) fn pdf_bytes(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn plain_text_documents() {
        assert_eq!(extract_document_text("notes.MD", b"# Login"), Ok("# Login".to_string()));
        assert_eq!(
            extract_document_text("notes.txt", &[0xff, 0xfe]),
            Err(DocumentError::Encoding)
        );
    }

    #[test]
    fn docx_paragraphs_are_joined() {
        let bytes = docx_bytes(&["Lock after 3 failed attempts", "", "Show a countdown"]);
        let text = extract_document_text("rules.docx", &bytes).unwrap();
        assert_eq!(text, "Lock after 3 failed attempts\nShow a countdown");
    }

    #[test]
    fn pdf_text_is_extracted() {
        let bytes = pdf_bytes("Password must be masked");
        let text = extract_document_text("rules.pdf", &bytes).unwrap();
        assert!(text.contains("Password must be masked"));
    }

    #[test]
    fn corrupt_files_fail() {
        assert!(matches!(
            extract_document_text("rules.docx", b"not a zip"),
            Err(DocumentError::Docx(_))
        ));
        assert!(matches!(
            extract_document_text("rules.pdf", b"not a pdf"),
            Err(DocumentError::Pdf(_))
        ));
    }

    #[test]
    fn unknown_extension() {
        assert_eq!(
            extract_document_text("rules.odt", b""),
            Err(DocumentError::Unsupported("odt".to_string()))
        );
    }
}
