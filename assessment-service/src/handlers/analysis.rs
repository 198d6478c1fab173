use crate::dtos::AnalyzeSessionResponse;
use crate::middleware::AuthenticatedUser;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id()))]
pub async fn analyze_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(session_id): Path<String>,
) -> Result<Json<AnalyzeSessionResponse>, AppError> {
    let analysis = state.analysis.analyze(user.user_id(), &session_id).await?;
    Ok(Json(AnalyzeSessionResponse::complete(analysis)))
}
