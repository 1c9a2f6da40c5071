use crate::dtos::HealthResponse;
use axum::{http::StatusCode, response::IntoResponse, Json};

/// Liveness only: answers without consulting the model.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::up()))
}
