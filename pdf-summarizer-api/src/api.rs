use crate::error::AppError;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Json, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use pdf_summarizer::{Config, SummarizerError, SummaryService, Upload};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Multipart field carrying the PDF
pub const FILE_FIELD: &str = "file";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SummaryService>,
    /// Host used in download links when the request has no `Host` header
    pub fallback_host: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(service: SummaryService, config: &Config) -> Self {
        AppState {
            service: Arc::new(service),
            fallback_host: config.bind_address(),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}

/// Response for a successful summarization
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    /// Sanitized name of the uploaded file
    pub original_filename: String,
    /// Number of pages in the uploaded PDF
    pub page_count: usize,
    /// Summary produced by the model
    pub summary_text: String,
    /// Absolute link to the generated summary PDF
    pub summary_pdf_url: String,
}

/// Build the application router with all routes configured
pub fn app(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/summarize", post(summarize_pdf))
        .route("/download/{filename}", get(download_file))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Summarize an uploaded PDF and link to the generated summary PDF
pub async fn summarize_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummarizeResponse>, AppError> {
    if !state.service.is_configured() {
        return Err(SummarizerError::ServiceNotConfigured.into());
    }

    let mut multipart = multipart.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?.to_vec();
            upload = Some(Upload { filename, bytes });
            break;
        }
    }

    let report = state.service.summarize_upload(upload).await?;
    let summary_pdf_url = download_url(&headers, &state.fallback_host, &report.file_name);

    Ok(Json(SummarizeResponse {
        original_filename: report.original_filename,
        page_count: report.page_count,
        summary_text: report.summary_text,
        summary_pdf_url,
    }))
}

/// Serve a generated summary PDF as an attachment
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = state.service.files().resolve(&filename).await?;

    let pdf_bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SummarizerError::FileNotFound(filename.clone()),
        _ => SummarizerError::Io(e),
    })?;

    tracing::debug!(file = %filename, bytes = pdf_bytes.len(), "serving summary PDF");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        pdf_bytes,
    )
        .into_response())
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "PDF Summarizer API",
        "version": env!("CARGO_PKG_VERSION"),
        "summarizer_configured": state.service.is_configured(),
    }))
}

/// `{scheme}://{host}/download/{file_name}` for the current request
pub fn download_url(headers: &HeaderMap, fallback_host: &str, file_name: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(fallback_host);

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("http");

    format!("{scheme}://{host}/download/{file_name}")
}
