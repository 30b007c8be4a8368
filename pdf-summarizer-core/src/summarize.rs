//! Summarization client for a hosted generative-language model

use crate::config::ModelConfig;
use crate::error::{Result, SummarizerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Produces a summary for a fully built prompt.
///
/// Implementations return [`SummarizerError::SummarizationBlocked`] when the
/// model refuses to answer and [`SummarizerError::SummarizationService`] for
/// transport or provider failures.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String>;

    /// Short description used in logs
    fn name(&self) -> &str;
}

/// Embed the extracted document text into the executive-summary instructions
pub fn build_prompt(document_text: &str) -> String {
    format!(
        r#"You are an expert assistant for document analysis and summarization. Your task is to read the text extracted from a PDF and write an executive summary.

The summary must:
1. Be clear, concise and objective.
2. Capture the main ideas and the conclusions of the document.
3. Be formatted as well-written paragraphs.
4. Ignore irrelevant text such as headers, footers or page numbers.

The document text follows:
---
{document_text}
"#
    )
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    status: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client, or `None` when no credential is configured
    pub fn from_config(config: &ModelConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(GeminiClient {
            http: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "calling model");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizerError::SummarizationService(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummarizerError::SummarizationService(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(SummarizerError::SummarizationService(describe_api_error(
                status.as_u16(),
                &body,
            )));
        }

        interpret_response(&body)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn describe_api_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("HTTP {status} ({code}): {}", envelope.error.message),
            None => format!("HTTP {status}: {}", envelope.error.message),
        },
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    }
}

/// Turn a successful `generateContent` body into summary text or a block
fn interpret_response(body: &str) -> Result<String> {
    let parsed: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        SummarizerError::SummarizationService(format!("invalid response body: {e}"))
    })?;

    let text: String = parsed
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    let reason = parsed
        .prompt_feedback
        .and_then(|f| f.block_reason)
        .or_else(|| {
            parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .filter(|r| r != "STOP")
        })
        .unwrap_or_else(|| "unspecified".to_string());

    Err(SummarizerError::SummarizationBlocked(reason))
}
