use crate::models::{ResponseItem, SituationResponse, TestSession, TestType, WordResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
pub struct NewWatTestResponse {
    pub words: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewSrtTestResponse {
    pub situations: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveWatSessionRequest {
    #[validate(nested)]
    pub responses: Vec<WordResponse>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveSrtSessionRequest {
    #[validate(nested)]
    pub responses: Vec<SituationResponse>,
}

impl SaveWatSessionRequest {
    pub fn into_items(self) -> Vec<ResponseItem> {
        self.responses.into_iter().map(ResponseItem::from).collect()
    }
}

impl SaveSrtSessionRequest {
    pub fn into_items(self) -> Vec<ResponseItem> {
        self.responses.into_iter().map(ResponseItem::from).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub user_id: String,
    pub test_type: TestType,
    pub responses: Vec<ResponseItem>,
    pub analysis: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TestSession> for SessionResponse {
    fn from(session: TestSession) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            test_type: session.test_type,
            responses: session.responses,
            analysis: session.analysis,
            created_at: session.created_at.to_rfc3339(),
            updated_at: session.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveSessionResponse {
    pub message: String,
    pub data: SessionResponse,
}

impl SaveSessionResponse {
    pub fn saved(session: TestSession) -> Self {
        Self {
            message: "Session saved successfully".to_string(),
            data: session.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeSessionResponse {
    pub message: String,
    pub analysis: serde_json::Value,
}

impl AnalyzeSessionResponse {
    pub fn complete(analysis: serde_json::Value) -> Self {
        Self {
            message: "Analysis complete".to_string(),
            analysis,
        }
    }
}
