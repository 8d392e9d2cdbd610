//! Integration tests for registration, login, logout, and health.

mod helpers;

use http::StatusCode;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["storage"], "available");
}

#[tokio::test]
async fn test_register_and_me() {
    let app = TestApp::new().await;
    let token = app.signup("Me@Example.com").await;

    let response = app.request("GET", "/users/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["email"], "me@example.com");
    assert!(response.body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/users/register",
            Some(serde_json::json!({
                "name": "X",
                "email": "not-an-email",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(response.body["details"]["email"].is_array());
}

#[tokio::test]
async fn test_register_rejects_malformed_json() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/users/register",
            Some(serde_json::json!({ "name": "X" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = TestApp::new().await;
    app.signup("twice@example.com").await;

    let response = app
        .request(
            "POST",
            "/users/register",
            Some(serde_json::json!({
                "name": "Again",
                "email": "TWICE@example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.signup("wrong@example.com").await;

    let response = app
        .request(
            "POST",
            "/users/login",
            Some(serde_json::json!({
                "email": "wrong@example.com",
                "password": "definitely-not-it",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new().await;
    let token = app.signup("logout@example.com").await;

    let response = app.request("POST", "/users/logout", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/users/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/users/me", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
