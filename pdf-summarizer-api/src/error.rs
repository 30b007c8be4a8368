use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdf_summarizer::SummarizerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
}

/// Errors surfaced by the HTTP handlers.
///
/// Pipeline errors are translated to status codes here and nowhere else.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Summarizer(#[from] SummarizerError),

    /// The request body could not be read as a multipart upload
    #[error("{}", describe_multipart(.0))]
    Multipart(#[from] MultipartError),

    /// The request was not a multipart form at all
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Summarizer(err) => match err {
                SummarizerError::Validation(_) | SummarizerError::EmptyContent => {
                    StatusCode::BAD_REQUEST
                }
                SummarizerError::FileNotFound(_) => StatusCode::NOT_FOUND,
                SummarizerError::SummarizationBlocked(_) => StatusCode::SERVICE_UNAVAILABLE,
                SummarizerError::ServiceNotConfigured
                | SummarizerError::DocumentParse(_)
                | SummarizerError::SummarizationService(_)
                | SummarizerError::Render(_)
                | SummarizerError::Io(_)
                | SummarizerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Summarizer(err) => err.kind(),
            AppError::Multipart(_) => "multipart_error",
            AppError::InvalidRequest(_) => "invalid_request",
        }
    }
}

fn describe_multipart(err: &MultipartError) -> String {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        "The upload exceeds the maximum allowed size".to_string()
    } else {
        format!("Failed to read multipart upload: {err}")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_msg = self.to_string();

        if status.is_server_error() {
            tracing::error!(kind = self.kind(), %status, "{}", error_msg);
        } else {
            tracing::warn!(kind = self.kind(), %status, "{}", error_msg);
        }

        let error_response = ErrorResponse { error: error_msg };

        (status, Json(error_response)).into_response()
    }
}
