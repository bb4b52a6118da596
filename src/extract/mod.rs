//! Document Text Extraction
//!
//! Converts uploaded PDF and DOCX files into plain linear text. No layout or
//! formatting fidelity is attempted.

pub mod docx;
pub mod pdf;

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::types::{AppError, AppResult};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            PDF_MIME => Some(DocumentFormat::Pdf),
            DOCX_MIME => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        mime_guess::from_path(filename)
            .iter()
            .find_map(|mime| Self::from_content_type(mime.essence_str()))
    }

    /// Content type first, then the file extension.
    pub fn detect(content_type: Option<&str>, filename: &str) -> AppResult<Self> {
        content_type
            .and_then(Self::from_content_type)
            .or_else(|| Self::from_filename(filename))
            .ok_or_else(|| {
                let what = content_type
                    .filter(|ct| !ct.is_empty())
                    .map(str::to_string)
                    .or_else(|| {
                        Path::new(filename)
                            .extension()
                            .map(|ext| format!(".{}", ext.to_string_lossy()))
                    })
                    .unwrap_or_else(|| filename.to_string());
                AppError::UnsupportedFormat(format!(
                    "{} (only PDF and DOCX files are supported)",
                    what
                ))
            })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::Docx => write!(f, "DOCX"),
        }
    }
}

/// Extract plain text from `bytes`. Fails with [`AppError::Extraction`] when
/// the container is unreadable or holds no text.
pub fn extract(bytes: &[u8], format: DocumentFormat) -> AppResult<String> {
    let text = match format {
        DocumentFormat::Pdf => pdf::extract_text(bytes)?,
        DocumentFormat::Docx => docx::extract_text(bytes)?,
    };

    if text.trim().is_empty() {
        warn!(format = %format, size = bytes.len(), "Document contains no text");
        return Err(AppError::Extraction(format!(
            "Could not extract text from {}",
            format
        )));
    }

    debug!(format = %format, chars = text.len(), "Extracted document text");
    Ok(text)
}
