//! Integration tests for directory operations.

mod helpers;

use http::StatusCode;

use helpers::{TestApp, listing_names};

#[tokio::test]
async fn test_list_requires_authentication() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/directory", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_new_user_root_is_empty() {
    let app = TestApp::new().await;
    let token = app.signup("empty@example.com").await;

    let response = app.request("GET", "/directory", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert!(listing_names(&response.body).is_empty());
}

#[tokio::test]
async fn test_create_nested_and_list() {
    let app = TestApp::new().await;
    let token = app.signup("nest@example.com").await;

    let response = app.request("POST", "/directory/docs", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["name"], "docs");

    let response = app
        .request("POST", "/directory/docs/2024", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.request("GET", "/directory/docs", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(listing_names(&response.body), vec!["2024"]);
    assert_eq!(response.body["data"][0]["isDirectory"], true);
}

#[tokio::test]
async fn test_create_under_missing_parent_is_not_found() {
    let app = TestApp::new().await;
    let token = app.signup("missing@example.com").await;

    let response = app
        .request("POST", "/directory/nope/child", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_sibling_rejected_then_free_after_rename() {
    let app = TestApp::new().await;
    let token = app.signup("dup@example.com").await;

    app.request("POST", "/directory/a", None, Some(&token)).await;
    let response = app.request("POST", "/directory/a", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let response = app
        .request(
            "PATCH",
            "/directory/a",
            Some(serde_json::json!({ "newName": "b" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "b");

    let response = app.request("POST", "/directory/a", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_move_directory() {
    let app = TestApp::new().await;
    let token = app.signup("move@example.com").await;

    app.request("POST", "/directory/src", None, Some(&token)).await;
    app.request("POST", "/directory/dst", None, Some(&token)).await;

    let response = app
        .request(
            "PATCH",
            "/directory/src",
            Some(serde_json::json!({ "newParentPath": "dst" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let root = app.request("GET", "/directory", None, Some(&token)).await;
    assert_eq!(listing_names(&root.body), vec!["dst"]);
    let dst = app.request("GET", "/directory/dst", None, Some(&token)).await;
    assert_eq!(listing_names(&dst.body), vec!["src"]);
}

#[tokio::test]
async fn test_move_into_descendant_is_cycle() {
    let app = TestApp::new().await;
    let token = app.signup("cycle@example.com").await;

    app.request("POST", "/directory/a", None, Some(&token)).await;
    app.request("POST", "/directory/a/b", None, Some(&token)).await;

    let response = app
        .request(
            "PATCH",
            "/directory/a",
            Some(serde_json::json!({ "newParentPath": "a/b" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "CYCLE");
}

#[tokio::test]
async fn test_patch_without_fields_rejected() {
    let app = TestApp::new().await;
    let token = app.signup("patch@example.com").await;
    app.request("POST", "/directory/a", None, Some(&token)).await;

    let response = app
        .request("PATCH", "/directory/a", Some(serde_json::json!({})), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cascade_delete_removes_subtree() {
    let app = TestApp::new().await;
    let token = app.signup("cascade@example.com").await;

    app.request("POST", "/directory/A", None, Some(&token)).await;
    app.request("POST", "/directory/A/B", None, Some(&token)).await;
    let upload = app.upload("A/B/F.txt", b"payload", &token).await;
    assert_eq!(upload.status, StatusCode::CREATED);
    assert_eq!(app.stored_file_count(), 1);

    let response = app.request("DELETE", "/directory/A", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["deletedDirCount"], 2);
    assert_eq!(response.body["data"]["deletedFileCount"], 1);

    assert_eq!(app.stored_file_count(), 0);
    let response = app.request("GET", "/directory/A", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("DELETE", "/directory/A", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dot_dot_segment_never_escapes() {
    let app = TestApp::new().await;
    let token = app.signup("dots@example.com").await;

    let response = app
        .request("GET", "/directory/a/%2E%2E/%2E%2E", None, Some(&token))
        .await;

    assert!(response.status.is_client_error());
    assert_ne!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_owners_are_isolated() {
    let app = TestApp::new().await;
    let alice = app.signup("alice@example.com").await;
    let bob = app.signup("bob@example.com").await;

    app.request("POST", "/directory/private", None, Some(&alice)).await;

    let response = app.request("GET", "/directory/private", None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app
        .request("DELETE", "/directory/private", None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", "/directory/private", None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
