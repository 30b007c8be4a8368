//! Plain-text extraction from uploaded PDF bytes

use crate::error::{Result, SummarizerError};
use oxidize_pdf::parser::{PdfDocument, PdfReader};
use std::io::Cursor;

/// Text pulled out of a PDF, in page order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub page_count: usize,
    pub text: String,
}

/// Parse `bytes` as a PDF and concatenate the text of every page.
///
/// Fails with [`SummarizerError::DocumentParse`] when the bytes are not a
/// readable PDF and with [`SummarizerError::EmptyContent`] when the document
/// parses but yields only whitespace.
pub fn extract(bytes: &[u8]) -> Result<ExtractedDocument> {
    let reader = PdfReader::new(Cursor::new(bytes))
        .map_err(|e| SummarizerError::DocumentParse(e.to_string()))?;
    let doc = PdfDocument::new(reader);

    let page_count = doc
        .page_count()
        .map_err(|e| SummarizerError::DocumentParse(e.to_string()))? as usize;

    let pages = doc
        .extract_text()
        .map_err(|e| SummarizerError::DocumentParse(e.to_string()))?;

    let text = pages
        .into_iter()
        .map(|page| page.text)
        .collect::<Vec<_>>()
        .join("\n");

    tracing::debug!(page_count, chars = text.len(), "extracted PDF text");

    if text.trim().is_empty() {
        return Err(SummarizerError::EmptyContent);
    }

    Ok(ExtractedDocument { page_count, text })
}
