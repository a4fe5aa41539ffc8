use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::auth_routes;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_callback_without_code_redirects_with_error() {
    let app = auth_routes(TestConfig::default().to_arc());

    let response = app.oneshot(get("/callback")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?error=no_code");
}

#[tokio::test]
async fn test_callback_exchanges_code_and_redirects_home() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "pkce"))
        .and(body_partial_json(json!({ "auth_code": "oauth-code-123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSupabaseResponses::auth_session_response()))
        .expect(1)
        .mount(&server)
        .await;

    let app = auth_routes(TestConfig::with_mock_server(&server.uri()).to_arc());
    let response = app.oneshot(get("/callback?code=oauth-code-123")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_callback_with_rejected_code_redirects_with_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            MockSupabaseResponses::error_response("invalid flow state", "bad_code_verifier"),
        ))
        .mount(&server)
        .await;

    let app = auth_routes(TestConfig::with_mock_server(&server.uri()).to_arc());
    let response = app.oneshot(get("/callback?code=stale")).await.unwrap();

    assert_eq!(location(&response), "/?error=auth_error");
}

#[tokio::test]
async fn test_validate_returns_token_owner() {
    let config = TestConfig::default().to_arc();
    let user = TestUser::staff("desk@clinic.test");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(1));

    let response = auth_routes(config)
        .oneshot(post_with_token("/validate", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["user_id"], user.id);
    assert_eq!(body["email"], "desk@clinic.test");
}

#[tokio::test]
async fn test_validate_rejects_expired_token() {
    let config = TestConfig::default().to_arc();
    let token = JwtTestUtils::create_expired_token(&TestUser::default(), &config.supabase_jwt_secret);

    let response = auth_routes(config)
        .oneshot(post_with_token("/validate", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Token expired");
}

#[tokio::test]
async fn test_validate_requires_header() {
    let response = auth_routes(TestConfig::default().to_arc())
        .oneshot(post_with_token("/validate", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_verify_reports_validity_without_failing() {
    let config = TestConfig::default().to_arc();
    let good = JwtTestUtils::create_test_token(&TestUser::default(), &config.supabase_jwt_secret, Some(1));
    let bad = JwtTestUtils::create_invalid_signature_token(&TestUser::default());

    let app = auth_routes(config);

    let response = app.clone().oneshot(post_with_token("/verify", Some(&good))).await.unwrap();
    assert_eq!(json_body(response).await, json!({ "valid": true }));

    let response = app.oneshot(post_with_token("/verify", Some(&bad))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "valid": false }));
}
