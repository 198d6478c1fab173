//! Persistence of completed test attempts.

use crate::models::{ResponseItem, TestSession, TestType};
use crate::services::repository::SessionRepository;
use service_core::error::AppError;
use std::sync::Arc;

pub struct SessionRecorder {
    sessions: Arc<dyn SessionRepository>,
}

impl SessionRecorder {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// Store `responses` as a new session owned by `user_id`.
    ///
    /// Responses are kept verbatim and in order, empty answers included.
    pub async fn record(
        &self,
        user_id: &str,
        test_type: TestType,
        responses: Vec<ResponseItem>,
    ) -> Result<TestSession, AppError> {
        let session = TestSession::new(user_id.to_string(), test_type, responses);

        self.sessions.insert_session(&session).await.map_err(|e| {
            tracing::error!(test_type = %test_type, "Failed to save session: {}", e);
            e
        })?;

        metrics::counter!("assessment_sessions_saved_total", "test_type" => test_type.as_str())
            .increment(1);
        tracing::info!(
            session_id = %session.id,
            test_type = %test_type,
            responses = session.responses.len(),
            "Session saved"
        );

        Ok(session)
    }
}
