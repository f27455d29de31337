//! OneBot v11 HTTP API client.

use albumdrop_core::config::OneBotConfig;
use albumdrop_core::{Transport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Response envelope shared by every OneBot API action.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status: String,
    retcode: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    wording: Option<String>,
}

/// [`Transport`] over the bot host's HTTP API.
pub struct OneBotClient {
    client: Client,
    api_url: String,
    access_token: Option<String>,
}

impl OneBotClient {
    pub fn new(config: &OneBotConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| {
                TransportError::ConnectionFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Invoke one API action and check its return code.
    async fn call(&self, action: &str, params: Value) -> Result<(), TransportError> {
        let url = format!("{}/{}", self.api_url, action);
        debug!(action, "Calling OneBot API");

        let mut request = self.client.post(&url).json(&params);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::ConnectionFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                retcode: status.as_u16() as i64,
                message: format!(
                    "HTTP {}: {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            });
        }

        let envelope: ApiResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        if envelope.retcode != 0 {
            let message = envelope
                .wording
                .or(envelope.msg)
                .filter(|m| !m.is_empty())
                .unwrap_or(envelope.status);
            return Err(TransportError::Api {
                retcode: envelope.retcode,
                message,
            });
        }

        Ok(())
    }
}

/// The host reads uploads from its own filesystem, so it needs an absolute path.
fn host_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[async_trait]
impl Transport for OneBotClient {
    fn name(&self) -> &str {
        "onebot"
    }

    async fn send_private_message(
        &self,
        user_id: i64,
        message: &str,
    ) -> Result<(), TransportError> {
        self.call(
            "send_private_msg",
            json!({ "user_id": user_id, "message": message }),
        )
        .await
    }

    async fn send_group_message(&self, group_id: i64, message: &str) -> Result<(), TransportError> {
        self.call(
            "send_group_msg",
            json!({ "group_id": group_id, "message": message }),
        )
        .await
    }

    async fn upload_private_file(
        &self,
        user_id: i64,
        path: &Path,
        name: &str,
    ) -> Result<(), TransportError> {
        self.call(
            "upload_private_file",
            json!({ "user_id": user_id, "file": host_path(path), "name": name }),
        )
        .await
    }

    async fn upload_group_file(
        &self,
        group_id: i64,
        path: &Path,
        name: &str,
    ) -> Result<(), TransportError> {
        self.call(
            "upload_group_file",
            json!({ "group_id": group_id, "file": host_path(path), "name": name }),
        )
        .await
    }
}
