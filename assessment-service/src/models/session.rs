//! Test session model: one completed attempt by one user.

use super::{TemplateVersion, TestType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A WAT answer: the prompt word and what the candidate wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct WordResponse {
    #[validate(length(min = 1, message = "word must not be empty"))]
    pub word: String,
    pub response: String,
}

/// An SRT answer: the situation and the candidate's reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SituationResponse {
    #[validate(length(min = 1, message = "situation must not be empty"))]
    pub situation: String,
    pub response: String,
}

/// One (prompt, response) pair as stored on a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseItem {
    Word(WordResponse),
    Situation(SituationResponse),
}

impl ResponseItem {
    pub fn prompt(&self) -> &str {
        match self {
            ResponseItem::Word(item) => &item.word,
            ResponseItem::Situation(item) => &item.situation,
        }
    }

    pub fn response(&self) -> &str {
        match self {
            ResponseItem::Word(item) => &item.response,
            ResponseItem::Situation(item) => &item.response,
        }
    }

    /// Whether the candidate actually wrote something.
    pub fn is_answered(&self) -> bool {
        !self.response().trim().is_empty()
    }
}

impl From<WordResponse> for ResponseItem {
    fn from(item: WordResponse) -> Self {
        ResponseItem::Word(item)
    }
}

impl From<SituationResponse> for ResponseItem {
    fn from(item: SituationResponse) -> Self {
        ResponseItem::Situation(item)
    }
}

/// A stored test session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSession {
    /// Opaque session identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Identity of the user who took the test.
    pub user_id: String,

    pub test_type: TestType,

    /// Answers in the order the prompts were shown.
    pub responses: Vec<ResponseItem>,

    /// Model-produced evaluation, once requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<serde_json::Value>,

    /// Template version that produced `analysis`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_version: Option<TemplateVersion>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl TestSession {
    pub fn new(user_id: String, test_type: TestType, responses: Vec<ResponseItem>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            test_type,
            responses,
            analysis: None,
            analysis_version: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when no response carries any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        !self.responses.iter().any(ResponseItem::is_answered)
    }

    /// Replace the analysis, as the store does on a successful analysis.
    pub fn attach_analysis(
        &mut self,
        analysis: serde_json::Value,
        responses: Vec<ResponseItem>,
        version: TemplateVersion,
    ) {
        self.analysis = Some(analysis);
        self.responses = responses;
        self.analysis_version = Some(version);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(word: &str, response: &str) -> ResponseItem {
        WordResponse {
            word: word.to_string(),
            response: response.to_string(),
        }
        .into()
    }

    #[test]
    fn whitespace_only_session_is_blank() {
        let session = TestSession::new(
            "user-1".to_string(),
            TestType::Wat,
            vec![word("Fear", "   "), word("Team", "\n\t")],
        );
        assert!(session.is_blank());
    }

    #[test]
    fn empty_session_is_blank() {
        let session = TestSession::new("user-1".to_string(), TestType::Srt, Vec::new());
        assert!(session.is_blank());
    }

    #[test]
    fn one_answer_makes_session_analyzable() {
        let session = TestSession::new(
            "user-1".to_string(),
            TestType::Wat,
            vec![word("Fear", ""), word("Duty", "comes first")],
        );
        assert!(!session.is_blank());
    }

    #[test]
    fn response_items_keep_their_wire_shape() {
        let items: Vec<ResponseItem> = serde_json::from_value(serde_json::json!([
            { "word": "Fear", "response": "I freeze" },
            { "situation": "Bus breaks down", "response": "Walk to the next stop" }
        ]))
        .unwrap();

        assert!(matches!(items[0], ResponseItem::Word(_)));
        assert!(matches!(items[1], ResponseItem::Situation(_)));
        assert_eq!(items[1].prompt(), "Bus breaks down");

        let back = serde_json::to_value(&items).unwrap();
        assert_eq!(back[0]["word"], "Fear");
        assert_eq!(back[1]["situation"], "Bus breaks down");
    }

    #[test]
    fn session_serializes_test_type_tag() {
        let session = TestSession::new("user-1".to_string(), TestType::Srt, Vec::new());
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["test_type"], "SRT");
        assert!(value.get("analysis").is_none());
    }
}
