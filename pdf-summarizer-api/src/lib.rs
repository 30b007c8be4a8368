//! # pdf-summarizer-api
//!
//! REST API server for the pdf-summarizer library
//!

mod api;
mod error;

pub use api::{
    app, download_file, download_url, health_check, summarize_pdf, AppState, SummarizeResponse,
    FILE_FIELD,
};
pub use error::{AppError, ErrorResponse};
