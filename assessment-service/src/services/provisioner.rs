//! Fresh practice tests drawn from the prompt corpus.

use crate::models::TestType;
use crate::services::repository::PromptRepository;
use rand::seq::SliceRandom;
use service_core::error::AppError;
use std::sync::Arc;

/// Upper bound on prompts handed out per test.
pub const MAX_TEST_PROMPTS: usize = 60;

pub struct TestProvisioner {
    prompts: Arc<dyn PromptRepository>,
}

impl TestProvisioner {
    pub fn new(prompts: Arc<dyn PromptRepository>) -> Self {
        Self { prompts }
    }

    /// Up to [`MAX_TEST_PROMPTS`] prompt texts in random order.
    ///
    /// Shuffles the whole corpus before truncating, so every stored prompt is
    /// equally likely to appear. An empty corpus yields an empty test.
    pub async fn new_test(&self, test_type: TestType) -> Result<Vec<String>, AppError> {
        let mut texts: Vec<String> = self
            .prompts
            .list_prompts(test_type)
            .await?
            .into_iter()
            .map(|prompt| prompt.text)
            .collect();

        texts.shuffle(&mut rand::thread_rng());
        texts.truncate(MAX_TEST_PROMPTS);

        tracing::debug!(test_type = %test_type, count = texts.len(), "Provisioned test");
        Ok(texts)
    }
}
