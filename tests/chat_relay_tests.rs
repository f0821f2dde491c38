use healthcare_backend::services::chat_relay::{ChatRelay, RelayError};
use healthcare_backend::services::gemini::{TextGenerator, UpstreamError};

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Answers only for `available`; every other model is reported missing.
struct CatalogGenerator {
    available: &'static str,
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for CatalogGenerator {
    async fn generate(&self, model: &str, _prompt: &str) -> Result<String, UpstreamError> {
        self.seen.lock().unwrap().push(model.to_string());
        if model == self.available {
            Ok(format!("answer from {model}"))
        } else {
            Err(UpstreamError::ModelNotFound {
                model: model.to_string(),
                message: "not found for API version v1beta".to_string(),
            })
        }
    }
}

struct FailingGenerator {
    calls: Mutex<usize>,
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, UpstreamError> {
        *self.calls.lock().unwrap() += 1;
        Err(UpstreamError::PermissionDenied("API not enabled".to_string()))
    }
}

fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_falls_back_past_missing_models() {
    let generator = Arc::new(CatalogGenerator {
        available: "gemini-flash-latest",
        seen: Mutex::new(Vec::new()),
    });
    let relay = ChatRelay::new(
        generator.clone(),
        models(&["gemini-pro", "gemini-2.5-flash", "gemini-flash-latest"]),
    );

    let reply = relay.relay("What is a normal resting heart rate?").await.unwrap();
    assert_eq!(reply, "answer from gemini-flash-latest");
    assert_eq!(
        *generator.seen.lock().unwrap(),
        models(&["gemini-pro", "gemini-2.5-flash", "gemini-flash-latest"])
    );
}

#[tokio::test]
async fn test_reports_last_missing_model_when_catalog_has_none() {
    let generator = Arc::new(CatalogGenerator {
        available: "something-else",
        seen: Mutex::new(Vec::new()),
    });
    let relay = ChatRelay::new(generator, models(&["gemini-pro", "gemini-1.0"]));

    match relay.relay("hello").await {
        Err(RelayError::Upstream(UpstreamError::ModelNotFound { model, .. })) => {
            assert_eq!(model, "gemini-1.0")
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_other_failures_do_not_fall_back() {
    let generator = Arc::new(FailingGenerator {
        calls: Mutex::new(0),
    });
    let relay = ChatRelay::new(generator.clone(), models(&["a", "b", "c"]));

    let result = relay.relay("hello").await;
    assert!(matches!(
        result,
        Err(RelayError::Upstream(UpstreamError::PermissionDenied(_)))
    ));
    assert_eq!(*generator.calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_empty_message_never_reaches_generator() {
    let generator = Arc::new(FailingGenerator {
        calls: Mutex::new(0),
    });
    let relay = ChatRelay::new(generator.clone(), models(&["a"]));

    assert!(matches!(relay.relay("").await, Err(RelayError::EmptyMessage)));
    assert_eq!(*generator.calls.lock().unwrap(), 0);
}
