//! Shared setup for assessment-service integration tests.
//!
//! The router runs in-process over in-memory storage, a scripted model and a
//! fixed token table, so no external services are needed.

#![allow(dead_code)]

use assessment_service::models::{Prompt, TemplateVersion, TestType};
use assessment_service::services::{InMemoryStore, MockTextProvider, StaticIdentityVerifier};
use assessment_service::startup::{build_router, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub provider: Arc<MockTextProvider>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new(), TemplateVersion::V2)
    }

    pub fn with_version(version: TemplateVersion) -> Self {
        Self::with_store(InMemoryStore::new(), version)
    }

    pub fn with_prompts(test_type: TestType, texts: &[String]) -> Self {
        let prompts = texts
            .iter()
            .map(|text| Prompt::new(text.clone(), None))
            .collect();
        Self::with_store(
            InMemoryStore::new().with_prompts(test_type, prompts),
            TemplateVersion::V2,
        )
    }

    fn with_store(store: InMemoryStore, version: TemplateVersion) -> Self {
        let store = Arc::new(store);
        let provider = Arc::new(MockTextProvider::new(version));
        let verifier = StaticIdentityVerifier::new()
            .with_user(ALICE_TOKEN, "alice")
            .with_user(BOB_TOKEN, "bob");

        let state = AppState::new(
            store.clone(),
            store.clone(),
            provider.clone(),
            Arc::new(verifier),
            version,
        );

        Self {
            router: build_router(state),
            store,
            provider,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Save a WAT session for `token` and return its id.
    pub async fn save_wat(&self, token: &str, responses: Value) -> String {
        let body = serde_json::json!({ "responses": responses }).to_string();
        let (status, json) = self
            .post_json("/api/save-wat-session", Some(token), &body)
            .await;
        assert_eq!(status, StatusCode::OK, "save failed: {}", json);
        json["data"]["id"].as_str().unwrap().to_string()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }
}
