//! Common test utilities for end-to-end testing with mocks.
//!
//! Builds the real router over a real dispatcher and orchestrator, with the
//! content library, cache index and bot host transport replaced by mocks.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use albumdrop_core::config::{AuthConfig, AuthMethod, OneBotConfig, OutputConfig};
use albumdrop_core::testing::{MockCacheIndex, MockLibrary, MockTransport, SentItem};
use albumdrop_core::{
    create_authenticator, BlockingBridge, CacheLocator, Config, DeliveryNotifier,
    DownloadOrchestrator, RequestDispatcher, TokioSpawner,
};

/// Re-export fixtures for test convenience
pub use albumdrop_core::testing::fixtures;

/// Access token used when a fixture is built with token auth.
pub const ACCESS_TOKEN: &str = "test-token";

/// Test fixture for end-to-end testing with mock dependencies.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock content library - configure downloads, searches, login state
    pub library: Arc<MockLibrary>,
    /// Mock cache index - configure index hits
    pub index: Arc<MockCacheIndex>,
    /// Mock bot host - inspect replies and uploads
    pub transport: Arc<MockTransport>,
    /// Download directory, inside the fixture's temp dir
    pub download_dir: PathBuf,
    _temp_dir: TempDir,
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with no authentication.
    pub async fn new() -> Self {
        Self::with_auth(AuthConfig::default()).await
    }

    /// Fixture requiring [`ACCESS_TOKEN`] on protected routes.
    pub async fn with_access_token() -> Self {
        Self::with_auth(AuthConfig {
            method: AuthMethod::AccessToken,
            access_token: Some(ACCESS_TOKEN.to_string()),
        })
        .await
    }

    async fn with_auth(auth: AuthConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let download_dir = temp_dir.path().join("pdf");
        std::fs::create_dir_all(&download_dir).expect("Failed to create download dir");

        let config = Config {
            onebot: OneBotConfig {
                api_url: "http://127.0.0.1:3000".to_string(),
                access_token: None,
                timeout_secs: 5,
            },
            auth,
            server: Default::default(),
            output: OutputConfig {
                download_dir: download_dir.clone(),
                extension: "pdf".to_string(),
            },
            library: Default::default(),
        };

        let library = Arc::new(MockLibrary::new());
        let index = Arc::new(MockCacheIndex::new());
        let transport = Arc::new(MockTransport::new());

        let bridge = BlockingBridge::new();
        let notifier = DeliveryNotifier::new(transport.clone());
        let orchestrator = Arc::new(DownloadOrchestrator::new(
            CacheLocator::new(config.output.clone(), index.clone(), bridge),
            library.clone(),
            bridge,
            notifier.clone(),
        ));
        let dispatcher = Arc::new(RequestDispatcher::new(
            orchestrator,
            library.clone(),
            bridge,
            notifier,
            Arc::new(TokioSpawner),
        ));

        let authenticator =
            Arc::from(create_authenticator(&config.auth).expect("Failed to create authenticator"));
        let state = Arc::new(albumdrop_server::state::AppState::new(
            config,
            authenticator,
            dispatcher,
        ));

        Self {
            router: albumdrop_server::api::create_router(state),
            library,
            index,
            transport,
            download_dir,
            _temp_dir: temp_dir,
        }
    }

    /// Write an artifact into the download directory.
    pub fn cache_artifact(&self, album_id: &str) -> PathBuf {
        let path = self.download_dir.join(format!("{}.pdf", album_id));
        std::fs::write(&path, b"%PDF-1.7").expect("Failed to write artifact");
        path
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    /// Send a GET request with a bearer token.
    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        self.request("GET", path, None, Some(token)).await
    }

    /// Post an event as the bot host would.
    pub async fn post_event(&self, event: Value) -> TestResponse {
        self.request("POST", "/onebot/event", Some(event), None).await
    }

    /// Post an event with a bearer token.
    pub async fn post_event_with_token(&self, event: Value, token: &str) -> TestResponse {
        self.request("POST", "/onebot/event", Some(event), Some(token))
            .await
    }

    /// Poll the mock transport until `count` items were sent.
    ///
    /// Events are dispatched on detached tasks, so replies arrive after the
    /// HTTP response.
    pub async fn wait_for_sent(&self, count: usize) -> Vec<SentItem> {
        let poll = async {
            loop {
                let sent = self.transport.sent().await;
                if sent.len() >= count {
                    return sent;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        match tokio::time::timeout(Duration::from_secs(5), poll).await {
            Ok(sent) => sent,
            Err(_) => panic!(
                "Timed out waiting for {} sent items, got {:?}",
                count,
                self.transport.sent().await
            ),
        }
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            request_builder =
                request_builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = if let Some(json_body) = body {
            request_builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&json_body).unwrap()))
                .unwrap()
        } else {
            request_builder.body(Body::empty()).unwrap()
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// A OneBot private message event.
pub fn private_message(user_id: i64, text: &str) -> Value {
    serde_json::json!({
        "time": 1700000000,
        "self_id": 10001,
        "post_type": "message",
        "message_type": "private",
        "sub_type": "friend",
        "user_id": user_id,
        "message": text,
        "raw_message": text,
    })
}

/// A OneBot group message event.
pub fn group_message(group_id: i64, user_id: i64, text: &str) -> Value {
    serde_json::json!({
        "time": 1700000000,
        "self_id": 10001,
        "post_type": "message",
        "message_type": "group",
        "sub_type": "normal",
        "group_id": group_id,
        "user_id": user_id,
        "message": text,
        "raw_message": text,
    })
}
