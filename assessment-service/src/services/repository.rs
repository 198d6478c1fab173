//! Storage seams for prompts and sessions.
//!
//! Handlers and services only see these traits; `MongoDb` backs them in
//! production and `InMemoryStore` in tests.

use crate::models::{Prompt, ResponseItem, TemplateVersion, TestSession, TestType};
use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Mutex;

/// Read access to the prompt corpus.
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// Every stored prompt of the given kind, in storage order.
    async fn list_prompts(&self, test_type: TestType) -> Result<Vec<Prompt>, AppError>;
}

/// Persistence of test sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert_session(&self, session: &TestSession) -> Result<(), AppError>;

    /// Load a session only if it belongs to `user_id`.
    async fn find_owned_session(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<TestSession>, AppError>;

    /// Overwrite the analysis (and responses) of an owned session and return
    /// the updated record, or `None` if it no longer matches.
    async fn attach_analysis(
        &self,
        session_id: &str,
        user_id: &str,
        analysis: &serde_json::Value,
        responses: &[ResponseItem],
        version: TemplateVersion,
    ) -> Result<Option<TestSession>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Process-local store for tests and local runs without MongoDB.
#[derive(Default)]
pub struct InMemoryStore {
    prompts: Mutex<HashMap<TestType, Vec<Prompt>>>,
    sessions: Mutex<HashMap<String, TestSession>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompts(self, test_type: TestType, prompts: Vec<Prompt>) -> Self {
        if let Ok(mut all) = self.prompts.lock() {
            all.insert(test_type, prompts);
        }
        self
    }

    /// Make every subsequent call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(message.to_string());
        }
    }

    pub fn session(&self, session_id: &str) -> Option<TestSession> {
        self.sessions.lock().ok()?.get(session_id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn check_failure(&self) -> Result<(), AppError> {
        let failure = self.failure.lock().map_err(poisoned)?;
        match failure.as_ref() {
            Some(message) => Err(AppError::DatabaseError(anyhow::anyhow!(message.clone()))),
            None => Ok(()),
        }
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("In-memory store mutex poisoned: {}", e))
}

#[async_trait]
impl PromptRepository for InMemoryStore {
    async fn list_prompts(&self, test_type: TestType) -> Result<Vec<Prompt>, AppError> {
        self.check_failure()?;
        let prompts = self.prompts.lock().map_err(poisoned)?;
        Ok(prompts.get(&test_type).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn insert_session(&self, session: &TestSession) -> Result<(), AppError> {
        self.check_failure()?;
        let mut sessions = self.sessions.lock().map_err(poisoned)?;
        if sessions.contains_key(&session.id) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "duplicate session id {}",
                session.id
            )));
        }
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn find_owned_session(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<TestSession>, AppError> {
        self.check_failure()?;
        let sessions = self.sessions.lock().map_err(poisoned)?;
        Ok(sessions
            .get(session_id)
            .filter(|s| s.user_id == user_id)
            .cloned())
    }

    async fn attach_analysis(
        &self,
        session_id: &str,
        user_id: &str,
        analysis: &serde_json::Value,
        responses: &[ResponseItem],
        version: TemplateVersion,
    ) -> Result<Option<TestSession>, AppError> {
        self.check_failure()?;
        let mut sessions = self.sessions.lock().map_err(poisoned)?;
        Ok(sessions
            .get_mut(session_id)
            .filter(|s| s.user_id == user_id)
            .map(|session| {
                session.attach_analysis(analysis.clone(), responses.to_vec(), version);
                session.clone()
            }))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.check_failure()
    }
}
