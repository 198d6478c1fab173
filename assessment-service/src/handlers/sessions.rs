use crate::dtos::{SaveSessionResponse, SaveSrtSessionRequest, SaveWatSessionRequest};
use crate::middleware::AuthenticatedUser;
use crate::models::TestType;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::validation::ValidatedJson;

#[tracing::instrument(skip(state, user, request), fields(user_id = %user.user_id()))]
pub async fn save_wat_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<SaveWatSessionRequest>,
) -> Result<Json<SaveSessionResponse>, AppError> {
    let session = state
        .recorder
        .record(user.user_id(), TestType::Wat, request.into_items())
        .await?;
    Ok(Json(SaveSessionResponse::saved(session)))
}

#[tracing::instrument(skip(state, user, request), fields(user_id = %user.user_id()))]
pub async fn save_srt_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<SaveSrtSessionRequest>,
) -> Result<Json<SaveSessionResponse>, AppError> {
    let session = state
        .recorder
        .record(user.user_id(), TestType::Srt, request.into_items())
        .await?;
    Ok(Json(SaveSessionResponse::saved(session)))
}
