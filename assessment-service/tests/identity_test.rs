use assessment_service::services::{HttpIdentityVerifier, IdentityError, IdentityVerifier};
use secrecy::Secret;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn verifier(server: &MockServer, api_key: Option<&str>) -> HttpIdentityVerifier {
    HttpIdentityVerifier::new(
        format!("{}/auth/v1/user", server.uri()),
        api_key.map(|key| Secret::new(key.to_string())),
    )
}

#[tokio::test]
async fn resolves_user_from_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer good-token"))
        .and(header("apikey", "project-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "8a6e0804-2bd0-4672-b79d-d97027f9071a",
            "email": "cadet@example.com",
            "role": "authenticated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = verifier(&server, Some("project-key"))
        .verify("good-token")
        .await
        .unwrap();

    assert_eq!(identity.user_id, "8a6e0804-2bd0-4672-b79d-d97027f9071a");
}

#[tokio::test]
async fn backend_rejection_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "msg": "invalid JWT" })),
        )
        .mount(&server)
        .await;

    let result = verifier(&server, None).verify("expired-token").await;

    match result {
        Err(IdentityError::Rejected(reason)) => assert!(reason.contains("invalid JWT")),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn payload_without_id_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "x@y.z" })))
        .mount(&server)
        .await;

    let result = verifier(&server, None).verify("token").await;

    assert!(matches!(result, Err(IdentityError::Rejected(_))));
}

#[tokio::test]
async fn unreachable_backend_is_unavailable() {
    let verifier = HttpIdentityVerifier::new("http://127.0.0.1:9/auth/v1/user", None);

    let result = verifier.verify("token").await;

    assert!(matches!(result, Err(IdentityError::Unavailable(_))));
}

#[tokio::test]
async fn backend_server_error_is_unavailable_not_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let result = verifier(&server, None).verify("tok").await;

    match result {
        Err(IdentityError::Unavailable(reason)) => assert!(reason.contains("upstream down")),
        other => panic!("expected unavailable, got {:?}", other),
    }
}
