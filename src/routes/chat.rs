use axum::extract::State;

use crate::{
    error::{AppError, AppJson},
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<ChatRequest>,
) -> Result<AppJson<ChatResponse>, AppError> {
    let response = state
        .relay
        .relay(payload.message.as_deref().unwrap_or_default())
        .await?;

    Ok(AppJson(ChatResponse {
        response,
        success: true,
    }))
}
