// src/state.rs
use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::services::chat_relay::ChatRelay;
use crate::services::gemini::GeminiClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub relay: ChatRelay,
    pub jitter: Mutex<StdRng>,
}

impl AppState {
    pub fn new(relay: ChatRelay, jitter: StdRng) -> Self {
        Self {
            relay,
            jitter: Mutex::new(jitter),
        }
    }

    /// Wires the Gemini client and jitter source described by `config`.
    ///
    /// A missing API key is not fatal: pages and the estimator keep working.
    pub fn from_config(config: &Config) -> Self {
        let relay = match GeminiClient::new(&config.gemini) {
            Ok(client) => {
                tracing::info!(models = ?config.gemini.models, "Initialized Gemini text generator");
                ChatRelay::new(Arc::new(client), config.gemini.models.clone())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat relay disabled");
                ChatRelay::unconfigured()
            }
        };

        let jitter = match config.jitter_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::new(relay, jitter)
    }
}
