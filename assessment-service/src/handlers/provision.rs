use crate::dtos::{NewSrtTestResponse, NewWatTestResponse};
use crate::models::TestType;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

#[tracing::instrument(skip(state))]
pub async fn new_wat_test(
    State(state): State<AppState>,
) -> Result<Json<NewWatTestResponse>, AppError> {
    let words = state.provisioner.new_test(TestType::Wat).await?;
    Ok(Json(NewWatTestResponse { words }))
}

#[tracing::instrument(skip(state))]
pub async fn new_srt_test(
    State(state): State<AppState>,
) -> Result<Json<NewSrtTestResponse>, AppError> {
    let situations = state.provisioner.new_test(TestType::Srt).await?;
    Ok(Json(NewSrtTestResponse { situations }))
}
