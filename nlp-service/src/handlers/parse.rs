use crate::dtos::{ParseRequest, ParseResponse};
use crate::services::metrics::{record_inference_duration, record_parse};
use crate::services::run_inference;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use std::time::Instant;

pub async fn parse_text(
    State(state): State<AppState>,
    request: ParseRequest,
) -> Result<Json<ParseResponse>, AppError> {
    tracing::info!(text = %request.text, "Received text for parsing");

    let model_name = state.model.name().to_string();
    let start = Instant::now();
    let result = run_inference(state.model.clone(), request.text).await;
    record_inference_duration(&model_name, start.elapsed().as_secs_f64());

    let outcome = result.map_err(|e| {
        record_parse("error", None);
        AppError::InternalError(
            anyhow::Error::new(e).context(format!("Error processing message with {}", model_name)),
        )
    })?;

    tracing::debug!(ranking = ?outcome.intent_ranking, "Intent ranking");

    let response = ParseResponse::from(outcome);
    record_parse("success", response.intent.as_deref());
    tracing::info!(
        intent = ?response.intent,
        confidence = response.confidence,
        entities = response.entities.len(),
        "Responding with parse result"
    );

    Ok(Json(response))
}
