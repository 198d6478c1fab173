//! Bearer-credential verification.
//!
//! The service never issues credentials; it only asks a verifier who a token
//! belongs to.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// The caller behind a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("token rejected: {0}")]
    Rejected(String),

    #[error("identity backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, IdentityError>;
}

/// Delegates verification to the identity backend's "current user" endpoint.
pub struct HttpIdentityVerifier {
    client: Client,
    user_url: String,
    api_key: Option<Secret<String>>,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
}

impl HttpIdentityVerifier {
    pub fn new(user_url: impl Into<String>, api_key: Option<Secret<String>>) -> Self {
        Self {
            client: Client::new(),
            user_url: user_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        let mut request = self.client.get(&self.user_url).bearer_auth(token);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Identity lookup request failed: {}", e);
            IdentityError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Identity backend failed: {}", body);
            return Err(IdentityError::Unavailable(format!("{}: {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, "Identity backend rejected token");
            return Err(IdentityError::Rejected(format!("{}: {}", status, body)));
        }

        let user: RemoteUser = response
            .json()
            .await
            .map_err(|e| IdentityError::Rejected(format!("unexpected user payload: {}", e)))?;

        Ok(Identity { user_id: user.id })
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Verifies HS256-signed tokens locally using the backend's shared secret.
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn new(secret: &Secret<String>, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| IdentityError::Rejected(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(IdentityError::Rejected("token has no subject".to_string()));
        }

        Ok(Identity {
            user_id: data.claims.sub,
        })
    }
}

/// Fixed token table, for tests and local development.
#[derive(Default)]
pub struct StaticIdentityVerifier {
    tokens: HashMap<String, Identity>,
}

impl StaticIdentityVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, token: &str, user_id: &str) -> Self {
        self.tokens.insert(
            token.to_string(),
            Identity {
                user_id: user_id.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("unknown token".to_string()))
    }
}
