//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use drivehub_core::config::{AppConfig, AuthConfig, DatabaseConfig, DatabaseProvider, StorageConfig};

/// A password that passes the default strength policy.
pub const PASSWORD: &str = "violet-harbor-71-lantern";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Temporary storage root, removed on drop
    pub dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test application backed by the in-memory store.
    pub async fn new() -> Self {
        Self::with_upload_limit(1024 * 1024).await
    }

    /// Create a test application with a specific upload limit.
    pub async fn with_upload_limit(max_upload_size_bytes: u64) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = AppConfig {
            database: DatabaseConfig {
                provider: DatabaseProvider::Memory,
                ..DatabaseConfig::default()
            },
            storage: StorageConfig {
                root_path: dir.path().join("storage").to_string_lossy().into_owned(),
                max_upload_size_bytes,
                sweep_partial_on_startup: true,
            },
            auth: AuthConfig {
                jwt_secret: "integration-test-secret".to_string(),
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        };

        let state = drivehub_api::build_state(config.clone())
            .await
            .expect("Failed to build state");
        let router = drivehub_api::router::build_router(state);

        Self {
            router,
            config,
            dir,
        }
    }

    /// Register a user and return their access token.
    pub async fn signup(&self, email: &str) -> String {
        let body = serde_json::json!({
            "name": "Test User",
            "email": email,
            "password": PASSWORD,
        });
        let response = self.request("POST", "/users/register", Some(body), None).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );
        self.login(email, PASSWORD).await
    }

    /// Login and return JWT access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self.request("POST", "/users/login", Some(body), None).await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let response = self
            .send(method, path, Body::from(body_str), Some("application/json"), token)
            .await;
        let body: Value = serde_json::from_slice(&response.bytes).unwrap_or(Value::Null);

        TestResponse {
            status: response.status,
            body,
        }
    }

    /// Upload raw bytes to `/files/{path}`.
    pub async fn upload(&self, path: &str, content: &[u8], token: &str) -> TestResponse {
        let response = self
            .send(
                "POST",
                &format!("/files/{path}"),
                Body::from(content.to_vec()),
                Some("application/octet-stream"),
                Some(token),
            )
            .await;
        let body: Value = serde_json::from_slice(&response.bytes).unwrap_or(Value::Null);
        TestResponse {
            status: response.status,
            body,
        }
    }

    /// Send a request and return the raw response.
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Body,
        content_type: Option<&str>,
        token: Option<&str>,
    ) -> RawResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(content_type) = content_type {
            req = req.header("Content-Type", content_type);
        }
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();

        RawResponse {
            status,
            headers,
            bytes,
        }
    }

    /// Count regular files below the storage root.
    pub fn stored_file_count(&self) -> usize {
        fn walk(dir: &std::path::Path) -> usize {
            std::fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .filter_map(Result::ok)
                        .map(|e| {
                            let path = e.path();
                            if path.is_dir() { walk(&path) } else { 1 }
                        })
                        .sum()
                })
                .unwrap_or(0)
        }
        walk(&self.dir.path().join("storage"))
    }
}

/// Response from a JSON test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Unparsed response
#[derive(Debug)]
pub struct RawResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body bytes
    pub bytes: Vec<u8>,
}

/// Names in a listing response, in order.
pub fn listing_names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
