//! Analysis of a stored session by the generative model.
//!
//! Flow: load the owned session, refuse blank sessions, render the versioned
//! template, call the provider once, parse and schema-check the reply, then
//! persist it. Nothing is written unless every earlier step succeeded.

pub mod schema;
pub mod template;

use crate::models::{TemplateVersion, TestSession};
use crate::services::providers::{FinishReason, ProviderError, TextProvider};
use crate::services::repository::SessionRepository;
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

pub use schema::validate_analysis;
pub use template::{format_responses, AnalysisTemplate};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Session has no answered responses")]
    EmptySession,

    #[error("Model call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Model returned malformed output: {0}")]
    MalformedOutput(String),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl AnalysisError {
    fn outcome(&self) -> &'static str {
        match self {
            AnalysisError::SessionNotFound => "not_found",
            AnalysisError::EmptySession => "empty",
            AnalysisError::Provider(_) => "provider_error",
            AnalysisError::MalformedOutput(_) => "malformed",
            AnalysisError::Store(_) => "store_error",
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::SessionNotFound => {
                AppError::NotFound(anyhow::anyhow!("Session not found."))
            }
            AnalysisError::EmptySession => AppError::BadRequest(anyhow::anyhow!(
                "Cannot analyze a session with no responses."
            )),
            AnalysisError::Provider(e) => AppError::InternalError(anyhow::anyhow!(
                "An error occurred during analysis: {}",
                e
            )),
            AnalysisError::MalformedOutput(_) => AppError::BadGateway(
                "The analysis model returned a malformed response. Please try again.".to_string(),
            ),
            AnalysisError::Store(e) => e,
        }
    }
}

/// Remove Markdown code fence markers, with or without a `json` tag.
///
/// Opening and closing markers are stripped independently, so a reply with
/// only one of them still parses.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Parse and schema-check a raw model reply.
pub fn parse_analysis(raw: &str, version: TemplateVersion) -> Result<Value, AnalysisError> {
    let analysis: Value = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| AnalysisError::MalformedOutput(format!("not valid JSON: {}", e)))?;
    validate_analysis(&analysis, version).map_err(AnalysisError::MalformedOutput)?;
    Ok(analysis)
}

pub struct AnalysisRequester {
    sessions: Arc<dyn SessionRepository>,
    provider: Arc<dyn TextProvider>,
    version: TemplateVersion,
}

impl AnalysisRequester {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        provider: Arc<dyn TextProvider>,
        version: TemplateVersion,
    ) -> Self {
        Self {
            sessions,
            provider,
            version,
        }
    }

    /// Analyze `session_id` on behalf of `user_id` and persist the result.
    pub async fn analyze(&self, user_id: &str, session_id: &str) -> Result<Value, AnalysisError> {
        let session = self
            .sessions
            .find_owned_session(session_id, user_id)
            .await?
            .ok_or(AnalysisError::SessionNotFound)?;

        let test_type = session.test_type;
        let result = self.run(session).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        };
        metrics::counter!(
            "assessment_analyses_total",
            "test_type" => test_type.as_str(),
            "outcome" => outcome
        )
        .increment(1);

        result
    }

    async fn run(&self, session: TestSession) -> Result<Value, AnalysisError> {
        if session.is_blank() {
            return Err(AnalysisError::EmptySession);
        }

        let formatted = format_responses(session.test_type, &session.responses);
        let prompt = AnalysisTemplate::new(self.version, session.test_type).render(&formatted);

        tracing::debug!(
            session_id = %session.id,
            model = self.provider.model(),
            version = %self.version,
            "Requesting analysis"
        );

        let started = Instant::now();
        let reply = self.provider.generate(&prompt).await;
        metrics::histogram!(
            "assessment_model_latency_seconds",
            "model" => self.provider.model().to_string()
        )
        .record(started.elapsed().as_secs_f64());

        let reply = reply.map_err(|e| {
            tracing::error!(session_id = %session.id, "Model call failed: {}", e);
            AnalysisError::Provider(e)
        })?;

        tracing::debug!(
            session_id = %session.id,
            input_tokens = reply.input_tokens,
            output_tokens = reply.output_tokens,
            "Model replied"
        );

        let truncated = reply.finish_reason == FinishReason::Length;
        if truncated {
            tracing::warn!(session_id = %session.id, "Model reply hit the token limit");
        }

        let analysis = parse_analysis(&reply.text, self.version).map_err(|e| {
            tracing::error!(session_id = %session.id, "Rejected model output: {}", e);
            match e {
                AnalysisError::MalformedOutput(reason) if truncated => {
                    AnalysisError::MalformedOutput(format!(
                        "reply truncated at the token limit: {}",
                        reason
                    ))
                }
                other => other,
            }
        })?;

        let updated = self
            .sessions
            .attach_analysis(
                &session.id,
                &session.user_id,
                &analysis,
                &session.responses,
                self.version,
            )
            .await?
            .ok_or(AnalysisError::SessionNotFound)?;

        tracing::info!(session_id = %updated.id, "Analysis stored");

        Ok(updated.analysis.unwrap_or(analysis))
    }
}
