//! Text extraction seam.
//!
//! OCR and PDF text extraction are external collaborators: the core only
//! requires something that turns uploaded bytes into one non-empty block of
//! text. The trait keeps the pipeline testable and lets deployments plug in
//! a real OCR backend without touching the core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextSourceError {
    #[error("Unsupported content type for text extraction: {0}")]
    UnsupportedContentType(String),

    #[error("Document is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("No text could be extracted from the document")]
    EmptyDocument,
}

/// Turns raw uploaded bytes into one block of text.
pub trait TextSource: Send + Sync {
    fn extract_text(&self, bytes: &[u8], content_type: &str) -> Result<String, TextSourceError>;
}

/// Built-in source for pre-extracted text uploads.
///
/// Handles `text/plain` only; PDF and image uploads need a real OCR backend
/// implementing `TextSource`.
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn extract_text(&self, bytes: &[u8], content_type: &str) -> Result<String, TextSourceError> {
        if content_type != "text/plain" {
            return Err(TextSourceError::UnsupportedContentType(
                content_type.to_string(),
            ));
        }

        let text = std::str::from_utf8(bytes)
            .map_err(|_| TextSourceError::InvalidEncoding)?
            .trim();

        if text.is_empty() {
            return Err(TextSourceError::EmptyDocument);
        }

        Ok(text.to_string())
    }
}
