//! Resume text extraction: the upstream collaborator that turns an uploaded
//! PDF or DOCX into plain text for the scoring core.
//!
//! Extraction never fails loudly: any error yields an empty string, which the
//! core reports as "no text could be extracted".

pub mod docx;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const UNSUPPORTED_FORMAT_FEEDBACK: &str =
    "Unsupported file format. Please upload a PDF or DOCX file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolves the kind from the declared MIME type, falling back to the
    /// file extension when the type is missing or generic.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some(PDF_MIME) => return Some(DocumentKind::Pdf),
            Some(DOCX_MIME) => return Some(DocumentKind::Docx),
            _ => {}
        }

        let extension = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Document text exceeds {limit} bytes once inflated")]
    TooLarge { limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts trimmed plain text. Returns `""` on any failure.
///
/// Parsing runs on the blocking pool; a panic inside a parser is contained
/// there and treated like any other extraction failure.
pub async fn extract_text(bytes: Bytes, kind: DocumentKind) -> String {
    let size = bytes.len();
    let joined = tokio::task::spawn_blocking(move || extract_blocking(&bytes, kind)).await;

    match joined {
        Ok(Ok(text)) => {
            let text = text.trim().to_string();
            debug!(?kind, bytes = size, chars = text.len(), "Text extracted");
            text
        }
        Ok(Err(e)) => {
            warn!(?kind, bytes = size, "Text extraction failed: {e}");
            String::new()
        }
        Err(e) => {
            warn!(?kind, bytes = size, "Text extraction aborted: {e}");
            String::new()
        }
    }
}

fn extract_blocking(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(format!("{e:?}")))
        }
        DocumentKind::Docx => docx::extract_docx_text(bytes),
    }
}
