//! Client for the Gemini `generateContent` REST endpoint.
//!
//! Only the non-streaming text path is used: one prompt in, the concatenated
//! text parts of the first candidate out.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GeminiSettings;

/// Failures talking to the upstream text-generation API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream API is not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Model {model} is not available: {message}")]
    ModelNotFound { model: String, message: String },

    #[error("Upstream API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

/// Something that turns a prompt into generated text with a named model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, UpstreamError>;
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Result<Self, UpstreamError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| UpstreamError::NotConfigured("GEMINI_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| UpstreamError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            api_base: settings.api_base.clone(),
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, UpstreamError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        tracing::debug!(model, prompt_len = prompt.len(), "Sending request to Gemini API");

        let response = self
            .client
            .post(self.generate_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(model, status, &body));
        }

        // Read and decode separately so a stalled body is reported as a network failure.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;
        let body: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;

        extract_text(body)
    }
}

fn extract_text(body: GenerateContentResponse) -> Result<String, UpstreamError> {
    if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(UpstreamError::MalformedResponse(format!(
            "prompt was blocked ({reason})"
        )));
    }

    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| UpstreamError::MalformedResponse("no candidates returned".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(UpstreamError::MalformedResponse(format!(
            "candidate has no text (finish reason {reason})"
        )));
    }

    Ok(text)
}

/// Maps a non-2xx Gemini reply onto an [`UpstreamError`].
pub fn classify_error(model: &str, status: StatusCode, body: &str) -> UpstreamError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| body.trim().to_string());
    let api_status = parsed.as_ref().and_then(|e| e.status.clone()).unwrap_or_default();
    let key_invalid = body.contains("API_KEY_INVALID");

    match status {
        _ if key_invalid => UpstreamError::InvalidApiKey(message),
        StatusCode::UNAUTHORIZED => UpstreamError::InvalidApiKey(message),
        StatusCode::FORBIDDEN => UpstreamError::PermissionDenied(message),
        StatusCode::TOO_MANY_REQUESTS => UpstreamError::QuotaExceeded(message),
        StatusCode::NOT_FOUND => UpstreamError::ModelNotFound {
            model: model.to_string(),
            message,
        },
        _ => match api_status.as_str() {
            "PERMISSION_DENIED" => UpstreamError::PermissionDenied(message),
            "RESOURCE_EXHAUSTED" => UpstreamError::QuotaExceeded(message),
            "NOT_FOUND" => UpstreamError::ModelNotFound {
                model: model.to_string(),
                message,
            },
            _ => UpstreamError::Api {
                status: status.as_u16(),
                message,
            },
        },
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}
