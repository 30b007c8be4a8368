//! The extract → summarize → render sequence behind one upload

use crate::config::Config;
use crate::error::{Result, SummarizerError};
use crate::extract::{extract, ExtractedDocument};
use crate::render::render;
use crate::storage::{sanitize_filename, GeneratedFiles};
use crate::summarize::{build_prompt, GeminiClient, Summarizer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// A file received from a client, held only in memory
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Outcome of a successful summarization
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub original_filename: String,
    pub page_count: usize,
    pub summary_text: String,
    /// Name of the generated PDF inside the generated-files directory
    pub file_name: String,
    pub path: PathBuf,
}

/// Shared, stateless request driver
pub struct SummaryService {
    summarizer: Option<Arc<dyn Summarizer>>,
    files: GeneratedFiles,
}

impl SummaryService {
    pub fn new(summarizer: Option<Arc<dyn Summarizer>>, files: GeneratedFiles) -> Self {
        SummaryService { summarizer, files }
    }

    /// Wire the Gemini client (when a key is present) and the generated directory
    pub fn from_config(config: &Config) -> Self {
        let summarizer = GeminiClient::from_config(&config.model)
            .map(|client| Arc::new(client) as Arc<dyn Summarizer>);
        if summarizer.is_none() {
            tracing::warn!("GOOGLE_API_KEY is not set; summarization requests will be rejected");
        }
        Self::new(summarizer, GeneratedFiles::new(&config.storage.generated_dir))
    }

    pub fn is_configured(&self) -> bool {
        self.summarizer.is_some()
    }

    pub fn files(&self) -> &GeneratedFiles {
        &self.files
    }

    fn summarizer(&self) -> Result<&Arc<dyn Summarizer>> {
        self.summarizer
            .as_ref()
            .ok_or(SummarizerError::ServiceNotConfigured)
    }

    /// Run the full pipeline for one upload.
    ///
    /// `None` means the request carried no file part. The configuration check
    /// happens before anything else, so an unconfigured service rejects every
    /// request the same way.
    pub async fn summarize_upload(&self, upload: Option<Upload>) -> Result<SummaryReport> {
        let started = Instant::now();
        self.summarizer()?;

        let (original_filename, bytes) = validate_upload(upload)?;
        tracing::info!(file = %original_filename, bytes = bytes.len(), "upload accepted");

        let extracted = extract_blocking(bytes).await?;
        tracing::info!(
            file = %original_filename,
            pages = extracted.page_count,
            chars = extracted.text.len(),
            "text extracted"
        );

        let summary_text = self.summarize_text(&extracted.text).await?;

        let (file_name, path) = self.files.allocate();
        let (text, destination) = (summary_text.clone(), path.clone());
        tokio::task::spawn_blocking(move || render(&text, &destination)).await??;

        tracing::info!(
            file = %original_filename,
            output = %file_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "summary generated"
        );

        Ok(SummaryReport {
            original_filename,
            page_count: extracted.page_count,
            summary_text,
            file_name,
            path,
        })
    }

    /// Ask the configured model for an executive summary of `document_text`
    pub async fn summarize_text(&self, document_text: &str) -> Result<String> {
        let summarizer = self.summarizer()?;
        let prompt = build_prompt(document_text);
        let started = Instant::now();
        let summary = summarizer.summarize(&prompt).await?;
        tracing::debug!(
            backend = summarizer.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            summary_chars = summary.len(),
            "summary received"
        );
        Ok(summary)
    }
}

/// Run [`extract`] off the async executor
pub async fn extract_blocking(bytes: Vec<u8>) -> Result<ExtractedDocument> {
    tokio::task::spawn_blocking(move || extract(&bytes)).await?
}

/// Check that a PDF file was supplied and return its cleaned name and bytes
pub fn validate_upload(upload: Option<Upload>) -> Result<(String, Vec<u8>)> {
    let upload =
        upload.ok_or_else(|| SummarizerError::Validation("No file was uploaded".to_string()))?;

    let name = upload.filename.trim();
    if name.is_empty() || !name.to_ascii_lowercase().ends_with(".pdf") {
        return Err(SummarizerError::Validation(
            "Invalid file or not a PDF".to_string(),
        ));
    }

    let mut cleaned = sanitize_filename(name);
    if cleaned.is_empty() {
        cleaned = "document.pdf".to_string();
    }

    Ok((cleaned, upload.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use oxidize_pdf::{Document, Font, Page};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct RecordingSummarizer {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Summarizer for RecordingSummarizer {
        async fn summarize(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("A short executive summary.".to_string())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct BlockingSummarizer;

    #[async_trait]
    impl Summarizer for BlockingSummarizer {
        async fn summarize(&self, _prompt: &str) -> Result<String> {
            Err(SummarizerError::SummarizationBlocked("SAFETY".to_string()))
        }

        fn name(&self) -> &str {
            "blocking"
        }
    }

    fn sample_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::new();
        let mut page = Page::a4();
        page.text()
            .set_font(Font::Helvetica, 12.0)
            .at(50.0, 750.0)
            .write(text)
            .unwrap();
        doc.add_page(page);
        let mut bytes = Vec::new();
        doc.write(&mut bytes).unwrap();
        bytes
    }

    fn upload(name: &str, bytes: Vec<u8>) -> Option<Upload> {
        Some(Upload {
            filename: name.to_string(),
            bytes,
        })
    }

    fn generated_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_validate_upload() {
        assert!(matches!(
            validate_upload(None),
            Err(SummarizerError::Validation(_))
        ));
        assert!(matches!(
            validate_upload(upload("", vec![1])),
            Err(SummarizerError::Validation(_))
        ));
        assert!(matches!(
            validate_upload(upload("notes.txt", vec![1])),
            Err(SummarizerError::Validation(_))
        ));

        let (name, bytes) = validate_upload(upload("Annual Report.PDF", vec![1, 2])).unwrap();
        assert_eq!(name, "Annual_Report.PDF");
        assert_eq!(bytes, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_pipeline_success() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(RecordingSummarizer {
            prompts: Mutex::new(Vec::new()),
        });
        let service = SummaryService::new(
            Some(recorder.clone() as Arc<dyn Summarizer>),
            GeneratedFiles::new(dir.path()),
        );

        let report = service
            .summarize_upload(upload(
                "test.pdf",
                sample_pdf("Hello world. This is a test document."),
            ))
            .await
            .unwrap();

        assert_eq!(report.original_filename, "test.pdf");
        assert_eq!(report.page_count, 1);
        assert_eq!(report.summary_text, "A short executive summary.");
        assert!(report.path.starts_with(dir.path()));
        assert!(std::fs::read(&report.path).unwrap().starts_with(b"%PDF"));

        let prompts = recorder.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Hello world. This is a test document."));
    }

    #[tokio::test]
    async fn test_unconfigured_service_rejects_everything() {
        let dir = tempfile::tempdir().unwrap();
        let service = SummaryService::new(None, GeneratedFiles::new(dir.path()));
        assert!(!service.is_configured());

        for candidate in [None, upload("notes.txt", vec![]), upload("a.pdf", sample_pdf("text"))] {
            let err = service.summarize_upload(candidate).await.unwrap_err();
            assert!(matches!(err, SummarizerError::ServiceNotConfigured));
        }
        assert_eq!(generated_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_blocked_summary_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let service = SummaryService::new(
            Some(Arc::new(BlockingSummarizer)),
            GeneratedFiles::new(dir.path()),
        );

        let err = service
            .summarize_upload(upload("a.pdf", sample_pdf("Some content")))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizerError::SummarizationBlocked(ref r) if r == "SAFETY"));
        assert_eq!(generated_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_parse_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let service = SummaryService::new(
            Some(Arc::new(BlockingSummarizer)),
            GeneratedFiles::new(dir.path()),
        );

        let err = service
            .summarize_upload(upload("broken.pdf", b"garbage".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizerError::DocumentParse(_)));
    }

    #[tokio::test]
    async fn test_render_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let service = SummaryService::new(
            Some(Arc::new(RecordingSummarizer {
                prompts: Mutex::new(Vec::new()),
            })),
            GeneratedFiles::new(dir.path().join("does-not-exist")),
        );

        let err = service
            .summarize_upload(upload("a.pdf", sample_pdf("Some content")))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizerError::Render(_)));
    }
}
