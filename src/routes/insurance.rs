use axum::extract::State;

use crate::{
    error::{AppError, AppJson},
    message::{PremiumRequest, PremiumResponse},
    services::premium::estimate,
    state::SharedState,
};

pub async fn predict_insurance_handler(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<PremiumRequest>,
) -> Result<AppJson<PremiumResponse>, AppError> {
    let input = payload.validate()?;

    let result = {
        let mut rng = state.jitter.lock().await;
        estimate(&input, &mut *rng)
    };

    tracing::info!(
        age = input.age,
        smoker = input.smoker,
        predicted_cost = result.predicted_cost,
        "Premium estimated"
    );

    Ok(AppJson(result.into()))
}
