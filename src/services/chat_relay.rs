// src/services/chat_relay.rs
use std::sync::Arc;

use thiserror::Error;

use super::gemini::{TextGenerator, UpstreamError};

const PROMPT_PREFIX: &str = "You are a helpful healthcare assistant. Provide quick, \
accurate healthcare advice. Keep responses concise and informative. \
If the query is serious, recommend consulting a healthcare professional.";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No message provided")]
    EmptyMessage,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Wraps the user's message in the healthcare instructions.
pub fn build_prompt(message: &str) -> String {
    format!("{PROMPT_PREFIX}\n\nUser question: {message}")
}

/// Forwards chat messages to the upstream generator.
///
/// A relay built without a generator still answers, with
/// [`UpstreamError::NotConfigured`] for every message.
#[derive(Clone)]
pub struct ChatRelay {
    generator: Option<Arc<dyn TextGenerator>>,
    models: Vec<String>,
}

impl ChatRelay {
    pub fn new(generator: Arc<dyn TextGenerator>, models: Vec<String>) -> Self {
        Self {
            generator: Some(generator),
            models,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            generator: None,
            models: Vec::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some() && !self.models.is_empty()
    }

    pub async fn relay(&self, message: &str) -> Result<String, RelayError> {
        if message.trim().is_empty() {
            return Err(RelayError::EmptyMessage);
        }

        let generator = self.generator.as_ref().ok_or_else(|| {
            UpstreamError::NotConfigured("GEMINI_API_KEY is not set".to_string())
        })?;

        let prompt = build_prompt(message);
        let mut last_error =
            UpstreamError::NotConfigured("no upstream model configured".to_string());

        for model in &self.models {
            match generator.generate(model, &prompt).await {
                Ok(text) => {
                    tracing::info!(model = %model, reply_len = text.len(), "Chat relayed");
                    return Ok(text);
                }
                Err(err @ UpstreamError::ModelNotFound { .. }) => {
                    tracing::warn!(model = %model, error = %err, "Model unavailable, trying next");
                    last_error = err;
                }
                Err(err) => {
                    tracing::error!(model = %model, error = %err, "Upstream call failed");
                    return Err(err.into());
                }
            }
        }

        Err(last_error.into())
    }
}
