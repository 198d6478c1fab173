use crate::services::{Identity, IdentityError};
use crate::startup::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use service_core::error::AppError;

/// The verified caller, resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::Unauthorized(anyhow::anyhow!("Not authenticated"))
                    } else {
                        AppError::Unauthorized(anyhow::anyhow!(
                            "Invalid token: malformed Authorization header"
                        ))
                    }
                })?;

        match state.verifier.verify(bearer.token()).await {
            Ok(identity) => Ok(AuthenticatedUser(identity)),
            Err(IdentityError::Rejected(reason)) => {
                tracing::debug!("Bearer token rejected: {}", reason);
                Err(AppError::Unauthorized(anyhow::anyhow!(
                    "Invalid token: {}",
                    reason
                )))
            }
            Err(IdentityError::Unavailable(reason)) => {
                tracing::error!("Identity backend unavailable: {}", reason);
                Err(AppError::ServiceUnavailable)
            }
        }
    }
}
