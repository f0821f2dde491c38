// src/routes/mod.rs
pub mod chat;
pub mod insurance;

use std::path::Path;

use crate::{error::AppError, state::SharedState};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chat::chat_handler;
use insurance::predict_insurance_handler;
use serde_json::{Value, json};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub fn create_router(pages_dir: impl AsRef<Path>) -> Router<SharedState> {
    let pages_dir = pages_dir.as_ref();

    let api_routes = Router::new()
        .route("/chat/", post(chat_handler).fallback(method_not_allowed))
        .route(
            "/predict-insurance/",
            post(predict_insurance_handler).fallback(method_not_allowed),
        );

    Router::new()
        .route_service("/", ServeFile::new(pages_dir.join("home.html")))
        .route_service("/chatbot/", ServeFile::new(pages_dir.join("chatbot.html")))
        .route_service(
            "/insurance-predictor/",
            ServeFile::new(pages_dir.join("insurance_predictor.html")),
        )
        .nest("/api", api_routes)
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(pages_dir))
        .layer(TraceLayer::new_for_http())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn health_handler(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "chat_configured": state.relay.is_configured(),
    }))
}
