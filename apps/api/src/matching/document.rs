//! PDF text extraction.
//!
//! The upload is staged to a named temp file for `pdf-extract`. The file is removed
//! when the `NamedTempFile` drops, which happens on every exit path including panics
//! inside the parser.

use std::io::Write;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::matching::pipeline::DocumentExtractor;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("document is empty")]
    Empty,

    #[error("failed to stage document: {0}")]
    Staging(#[from] std::io::Error),

    #[error("failed to read document text: {0}")]
    Unreadable(String),
}

/// Extracts concatenated page text from PDF bytes.
pub struct PdfTextExtractor;

#[async_trait]
impl DocumentExtractor for PdfTextExtractor {
    async fn extract_text(&self, document: &[u8]) -> Result<String, ExtractorError> {
        if document.is_empty() {
            return Err(ExtractorError::Empty);
        }

        let staged = stage_document(document)?;
        debug!(path = %staged.path().display(), bytes = document.len(), "staged document");

        // pdf-extract is synchronous and may panic on malformed input.
        let parsed = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text(staged.path()).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ExtractorError::Unreadable(format!("PDF parser aborted: {e}")))?;

        parsed.map_err(ExtractorError::Unreadable)
    }
}

fn stage_document(document: &[u8]) -> Result<NamedTempFile, ExtractorError> {
    let mut staged = tempfile::Builder::new()
        .prefix("cv-upload-")
        .suffix(".pdf")
        .tempfile()?;
    staged.write_all(document)?;
    staged.flush()?;
    Ok(staged)
}
