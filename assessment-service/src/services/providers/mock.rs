//! Scripted provider for tests and local runs without an API key.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use crate::models::{TemplateVersion, OLQ_RATING_KEYS};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

enum Scripted {
    Text(String, FinishReason),
    Failure(String),
}

/// Mock text provider that replays queued replies and records every prompt.
///
/// Once the queue is empty it answers with a well-formed analysis for
/// `version`, wrapped in a ```json fence like the real model tends to do.
pub struct MockTextProvider {
    version: TemplateVersion,
    queue: Mutex<VecDeque<Scripted>>,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(version: TemplateVersion) -> Self {
        Self {
            version,
            queue: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a raw model reply.
    pub fn push_text(&self, text: impl Into<String>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(Scripted::Text(text.into(), FinishReason::Complete));
        }
    }

    /// Queue a reply that stopped at the output token limit.
    pub fn push_truncated(&self, text: impl Into<String>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(Scripted::Text(text.into(), FinishReason::Length));
        }
    }

    /// Queue an upstream failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(Scripted::Failure(message.into()));
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// A schema-conforming analysis body for `version`.
    pub fn sample_analysis(version: TemplateVersion) -> Value {
        let ratings: Map<String, Value> = OLQ_RATING_KEYS
            .iter()
            .map(|key| (key.to_string(), json!(3)))
            .collect();

        let mut analysis = json!({
            "overall_summary": "Responses are short and mostly reactive.",
            "positive_traits": ["Honest about feelings"],
            "areas_for_improvement": ["Show initiative instead of describing fear"],
            "olq_rating": ratings,
        });
        analysis[version.closing_key()] =
            json!("Not recommended yet; practise constructive responses.");
        analysis
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        let (text, finish_reason) = match next {
            Some(Scripted::Text(text, finish_reason)) => (text, finish_reason),
            Some(Scripted::Failure(message)) => return Err(ProviderError::ApiError(message)),
            None => (
                format!("```json\n{}\n```", Self::sample_analysis(self.version)),
                FinishReason::Complete,
            ),
        };

        Ok(ProviderResponse {
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: text.len() as i32 / 4,
            text,
            finish_reason,
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_queue_then_falls_back_to_sample() {
        let provider = MockTextProvider::new(TemplateVersion::V2);
        provider.push_text("not json");
        provider.push_failure("quota exceeded");

        assert_eq!(provider.generate("p1").await.unwrap().text, "not json");
        assert!(matches!(
            provider.generate("p2").await,
            Err(ProviderError::ApiError(msg)) if msg == "quota exceeded"
        ));
        assert!(provider
            .generate("p3")
            .await
            .unwrap()
            .text
            .contains("final_verdict"));
        assert_eq!(provider.prompts(), vec!["p1", "p2", "p3"]);
    }
}
