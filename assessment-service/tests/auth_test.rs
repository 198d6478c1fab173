use assessment_service::models::TemplateVersion;
use assessment_service::services::{InMemoryStore, JwtIdentityVerifier, MockTextProvider};
use assessment_service::startup::{build_router, AppState};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::Secret;
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;

const SECRET: &str = "local-signing-secret";

fn app(store: Arc<InMemoryStore>) -> Router {
    let verifier = JwtIdentityVerifier::new(&Secret::new(SECRET.to_string()), None);
    build_router(AppState::new(
        store.clone(),
        store,
        Arc::new(MockTextProvider::new(TemplateVersion::V2)),
        Arc::new(verifier),
        TemplateVersion::V2,
    ))
}

fn signed_token(sub: &str) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": sub, "exp": chrono::Utc::now().timestamp() + 600 }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn save_request(authorization: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/save-wat-session")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, authorization)
        .body(Body::from(r#"{"responses": [{"word": "Lead", "response": "by example"}]}"#))
        .unwrap()
}

#[tokio::test]
async fn locally_signed_token_owns_the_saved_session() {
    let store = Arc::new(InMemoryStore::new());
    let token = signed_token("user-42");

    let response = app(store.clone())
        .oneshot(save_request(&format!("Bearer {}", token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.session_count(), 1);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let forged = encode(
        &Header::default(),
        &json!({ "sub": "user-42", "exp": chrono::Utc::now().timestamp() + 600 }),
        &EncodingKey::from_secret(b"someone-else"),
    )
    .unwrap();

    let response = app(store.clone())
        .oneshot(save_request(&format!("Bearer {}", forged)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.session_count(), 0);
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let store = Arc::new(InMemoryStore::new());

    let response = app(store.clone())
        .oneshot(save_request("Basic dXNlcjpwYXNz"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.session_count(), 0);
}

#[tokio::test]
async fn responses_carry_security_and_request_id_headers() {
    let store = Arc::new(InMemoryStore::new());

    let response = app(store)
        .oneshot(
            Request::builder()
                .uri("/")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-123");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}
