use std::io::Cursor;

use standard_error::{Interpolate, StandardError};

use crate::prelude::Result;

/// Decodes raw document bytes into plain text by MIME type. Unrecognized
/// types are a fatal unsupported-format error for the current attempt.
pub fn extract_document(data: Vec<u8>, content_type: &str) -> Result<String> {
    match content_type {
        "application/pdf" => extract_text_from_pdf(&data),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            extract_text_from_docx(&data)
        }
        "text/plain" => String::from_utf8(data)
            .map_err(|e| StandardError::new("ERR-FILE-001").interpolate_err(e.to_string())),
        _ => Err(StandardError::new("ERR-FILE-001")
            .interpolate_err(format!("unsupported content type {}", content_type))),
    }
}

fn extract_text_from_pdf(data: &[u8]) -> Result<String> {
    use lopdf::Document;
    let doc = Document::load_from(Cursor::new(data))
        .map_err(|e| StandardError::new("ERR-FILE-001").interpolate_err(e.to_string()))?;

    let mut text = String::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push(' ');
            }
            Err(e) => {
                tracing::warn!("failed to extract text from page {}: {}", page_num, e);
            }
        }
    }

    if text.trim().is_empty() {
        return Err(
            StandardError::new("ERR-FILE-001").interpolate_err("no text extracted from pdf".into())
        );
    }
    Ok(text.trim().to_string())
}

fn extract_text_from_docx(data: &[u8]) -> Result<String> {
    use docx_rs::read_docx;
    let docx = read_docx(data)
        .map_err(|e| StandardError::new("ERR-FILE-001").interpolate_err(e.to_string()))?;
    let mut text = String::new();
    for paragraph in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = paragraph {
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::extract_document;

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_document(b"Skills: Go, SQL".to_vec(), "text/plain").unwrap();
        assert_eq!(text, "Skills: Go, SQL");
    }

    #[test]
    fn test_unknown_content_type_rejected() {
        assert!(extract_document(vec![0u8; 4], "image/png").is_err());
    }
}
