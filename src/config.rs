// src/config.rs
use std::{path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_FALLBACK_MODELS: &str = "gemini-flash-latest";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the upstream text-generation API.
#[derive(Clone)]
pub struct GeminiSettings {
    /// `None` leaves the chat relay unconfigured; every chat request then fails with 503.
    pub api_key: Option<String>,
    pub api_base: String,
    /// Tried in order; later entries are used only when an earlier model is not found.
    pub models: Vec<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("models", &self.models)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub pages_dir: PathBuf,
    pub gemini: GeminiSettings,
    pub jitter_seed: Option<u64>,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("APP_PORT", get("APP_PORT"), 3000u16)?;
        let pages_dir = PathBuf::from(get("PAGES_DIR").unwrap_or_else(|| "public".to_string()));

        let mut models = vec![get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string())];
        let fallbacks =
            get("GEMINI_FALLBACK_MODELS").unwrap_or_else(|| DEFAULT_FALLBACK_MODELS.to_string());
        for name in fallbacks.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !models.iter().any(|m| m == name) {
                models.push(name.to_string());
            }
        }

        let timeout_secs = parse_or("GEMINI_TIMEOUT_SECS", get("GEMINI_TIMEOUT_SECS"), 60u64)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "GEMINI_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let jitter_seed = match get("PREMIUM_JITTER_SEED") {
            Some(raw) => Some(parse_or("PREMIUM_JITTER_SEED", Some(raw), 0u64)?),
            None => None,
        };

        Ok(Self {
            host,
            port,
            pages_dir,
            gemini: GeminiSettings {
                api_key: get("GEMINI_API_KEY"),
                api_base: get("GEMINI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                models,
                timeout: Duration::from_secs(timeout_secs),
            },
            jitter_seed,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
