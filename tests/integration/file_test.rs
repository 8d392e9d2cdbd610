//! Integration tests for file operations.

mod helpers;

use axum::body::Body;
use http::{StatusCode, header};

use helpers::{TestApp, listing_names};

#[tokio::test]
async fn test_upload_requires_authentication() {
    let app = TestApp::new().await;

    let response = app
        .send("POST", "/files/a.txt", Body::from("x"), None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_upload_download_round_trip() {
    let app = TestApp::new().await;
    let token = app.signup("files@example.com").await;

    let payloads: [(&str, Vec<u8>); 3] = [
        ("empty.bin", Vec::new()),
        ("one.bin", vec![0x5a]),
        ("big.bin", (0..300_000u32).map(|i| (i % 251) as u8).collect()),
    ];

    for (name, content) in &payloads {
        let response = app.upload(name, content, &token).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        assert_eq!(response.body["data"]["name"], *name);
        assert_eq!(response.body["data"]["size"], content.len());

        let download = app
            .send("GET", &format!("/files/{name}"), Body::empty(), None, Some(&token))
            .await;
        assert_eq!(download.status, StatusCode::OK);
        assert_eq!(&download.bytes, content);
        assert_eq!(
            download.headers[header::CONTENT_LENGTH],
            content.len().to_string().as_str()
        );
    }
}

#[tokio::test]
async fn test_download_disposition_modes() {
    let app = TestApp::new().await;
    let token = app.signup("modes@example.com").await;
    app.upload("notes.txt", b"hello", &token).await;

    let open = app
        .send("GET", "/files/notes.txt?action=open", Body::empty(), None, Some(&token))
        .await;
    assert_eq!(open.status, StatusCode::OK);
    assert_eq!(open.headers[header::CONTENT_TYPE], "text/plain");
    let disposition = open.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("inline;"));

    let download = app
        .send("GET", "/files/notes.txt", Body::empty(), None, Some(&token))
        .await;
    let disposition = download.headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains("filename=\"notes.txt\""));
}

#[tokio::test]
async fn test_upload_into_subdirectory_is_listed() {
    let app = TestApp::new().await;
    let token = app.signup("sub@example.com").await;
    app.request("POST", "/directory/docs", None, Some(&token)).await;

    let response = app.upload("docs/report.pdf", b"%PDF-1.7", &token).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let listing = app.request("GET", "/directory/docs", None, Some(&token)).await;
    assert_eq!(listing_names(&listing.body), vec!["report.pdf"]);
    assert_eq!(listing.body["data"][0]["isDirectory"], false);
    assert_eq!(listing.body["data"][0]["size"], 8);
}

#[tokio::test]
async fn test_duplicate_upload_rejected() {
    let app = TestApp::new().await;
    let token = app.signup("dupfile@example.com").await;

    app.upload("a.txt", b"one", &token).await;
    let response = app.upload("a.txt", b"two", &token).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stored_file_count(), 1);
}

#[tokio::test]
async fn test_oversized_upload_leaves_nothing_behind() {
    let app = TestApp::with_upload_limit(16).await;
    let token = app.signup("big@example.com").await;

    let response = app.upload("big.bin", &[7u8; 64], &token).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.body["error"], "PAYLOAD_TOO_LARGE");
    assert_eq!(app.stored_file_count(), 0);
    let listing = app.request("GET", "/directory", None, Some(&token)).await;
    assert!(listing_names(&listing.body).is_empty());
}

#[tokio::test]
async fn test_rename_then_download_under_new_name() {
    let app = TestApp::new().await;
    let token = app.signup("rename@example.com").await;
    app.upload("old.txt", b"content", &token).await;

    let response = app
        .request(
            "PATCH",
            "/files/old.txt",
            Some(serde_json::json!({ "newName": "new.txt" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["originalName"], "new.txt");
    assert!(response.body["data"].get("storedName").is_none());

    let old = app
        .send("GET", "/files/old.txt", Body::empty(), None, Some(&token))
        .await;
    assert_eq!(old.status, StatusCode::NOT_FOUND);
    let new = app
        .send("GET", "/files/new.txt", Body::empty(), None, Some(&token))
        .await;
    assert_eq!(new.bytes, b"content");
}

#[tokio::test]
async fn test_delete_file() {
    let app = TestApp::new().await;
    let token = app.signup("delete@example.com").await;
    app.upload("gone.txt", b"bye", &token).await;

    let response = app.request("DELETE", "/files/gone.txt", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.stored_file_count(), 0);

    let response = app.request("DELETE", "/files/gone.txt", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cross_owner_download_is_not_found() {
    let app = TestApp::new().await;
    let alice = app.signup("alice.files@example.com").await;
    let bob = app.signup("bob.files@example.com").await;
    app.upload("secret.txt", b"alice only", &alice).await;

    let response = app
        .send("GET", "/files/secret.txt", Body::empty(), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("DELETE", "/files/secret.txt", None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
