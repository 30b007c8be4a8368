//! Error types for the summarization pipeline

use thiserror::Error;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, SummarizerError>;

/// Every way a summarization request can fail.
///
/// The variants carry no transport semantics; callers decide how to surface
/// them (the HTTP layer maps them to status codes).
#[derive(Error, Debug)]
pub enum SummarizerError {
    /// The upload was missing or malformed
    #[error("{0}")]
    Validation(String),

    /// The PDF parsed but carries no extractable text
    #[error("The PDF does not contain extractable text")]
    EmptyContent,

    /// No model credential was configured at startup
    #[error("The summarization service is not configured. Check the API key")]
    ServiceNotConfigured,

    /// The bytes could not be read as a PDF
    #[error("Failed to parse PDF: {0}")]
    DocumentParse(String),

    /// The model declined to answer
    #[error("The summarization service blocked the request. Reason: {0}")]
    SummarizationBlocked(String),

    /// Transport, authentication or quota failure talking to the model
    #[error("Summarization service error: {0}")]
    SummarizationService(String),

    /// The summary PDF could not be produced or written
    #[error("Failed to render summary PDF: {0}")]
    Render(String),

    /// A generated file was requested that does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SummarizerError {
    /// Stable identifier for logs and clients
    pub fn kind(&self) -> &'static str {
        match self {
            SummarizerError::Validation(_) => "validation_error",
            SummarizerError::EmptyContent => "empty_content",
            SummarizerError::ServiceNotConfigured => "service_not_configured",
            SummarizerError::DocumentParse(_) => "document_parse_error",
            SummarizerError::SummarizationBlocked(_) => "summarization_blocked",
            SummarizerError::SummarizationService(_) => "summarization_service_error",
            SummarizerError::Render(_) => "render_error",
            SummarizerError::FileNotFound(_) => "file_not_found",
            SummarizerError::Io(_) => "io_error",
            SummarizerError::Internal(_) => "internal_error",
        }
    }

    /// Whether the failure was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SummarizerError::Validation(_)
                | SummarizerError::EmptyContent
                | SummarizerError::FileNotFound(_)
        )
    }
}

impl From<tokio::task::JoinError> for SummarizerError {
    fn from(err: tokio::task::JoinError) -> Self {
        SummarizerError::Internal(format!("background task failed: {err}"))
    }
}
