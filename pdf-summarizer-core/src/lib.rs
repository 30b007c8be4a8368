//! # pdf-summarizer
//!
//! Turns an uploaded PDF into an executive summary: the document text is
//! extracted, sent to a hosted generative-language model, and the answer is
//! rendered into a new PDF stored under a unique name.
//!
//! ```rust,no_run
//! use pdf_summarizer::{Config, SummaryService, Upload};
//!
//! # async fn run() -> pdf_summarizer::Result<()> {
//! let config = Config::from_env();
//! let service = SummaryService::from_config(&config);
//! let bytes = std::fs::read("report.pdf")?;
//! let report = service
//!     .summarize_upload(Some(Upload { filename: "report.pdf".into(), bytes }))
//!     .await?;
//! println!("{}", report.summary_text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod render;
pub mod storage;
pub mod summarize;

pub use config::{Config, ModelConfig, ServerConfig, StorageConfig};
pub use error::{Result, SummarizerError};
pub use extract::{extract, ExtractedDocument};
pub use pipeline::{extract_blocking, validate_upload, SummaryReport, SummaryService, Upload};
pub use render::{render, render_to_bytes, render_with_layout, SummaryLayout, SUMMARY_TITLE};
pub use storage::{ensure_directories, sanitize_filename, GeneratedFiles};
pub use summarize::{build_prompt, GeminiClient, Summarizer};

/// Current version of pdf-summarizer
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
