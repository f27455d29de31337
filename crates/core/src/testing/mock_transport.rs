//! Mock messaging transport for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transport::{Transport, TransportError};

/// A successful outbound call, recorded for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentItem {
    PrivateMessage { user_id: i64, text: String },
    GroupMessage { group_id: i64, text: String },
    PrivateFile { user_id: i64, path: PathBuf, name: String },
    GroupFile { group_id: i64, path: PathBuf, name: String },
}

impl SentItem {
    /// Message text, `None` for file uploads.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::PrivateMessage { text, .. } | Self::GroupMessage { text, .. } => Some(text),
            Self::PrivateFile { .. } | Self::GroupFile { .. } => None,
        }
    }

    /// Uploaded file path, `None` for messages.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PrivateFile { path, .. } | Self::GroupFile { path, .. } => Some(path),
            Self::PrivateMessage { .. } | Self::GroupMessage { .. } => None,
        }
    }
}

/// Mock implementation of the [`Transport`] trait.
///
/// Records successful sends in order. Messages and uploads can be made to
/// fail independently; failed calls are not recorded in [`sent`](Self::sent).
#[derive(Debug, Default)]
pub struct MockTransport {
    sent: Arc<RwLock<Vec<SentItem>>>,
    fail_messages: Arc<RwLock<bool>>,
    fail_uploads: Arc<RwLock<bool>>,
    upload_attempts: Arc<RwLock<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every successful call, in order.
    pub async fn sent(&self) -> Vec<SentItem> {
        self.sent.read().await.clone()
    }

    /// Texts of every successful message, in order.
    pub async fn texts(&self) -> Vec<String> {
        self.sent
            .read()
            .await
            .iter()
            .filter_map(|item| item.text().map(String::from))
            .collect()
    }

    /// Paths of every successful upload, in order.
    pub async fn uploaded_paths(&self) -> Vec<PathBuf> {
        self.sent
            .read()
            .await
            .iter()
            .filter_map(|item| item.path().map(Path::to_path_buf))
            .collect()
    }

    /// Upload calls made, successful or not.
    pub async fn upload_attempts(&self) -> usize {
        *self.upload_attempts.read().await
    }

    pub async fn fail_messages(&self, fail: bool) {
        *self.fail_messages.write().await = fail;
    }

    pub async fn fail_uploads(&self, fail: bool) {
        *self.fail_uploads.write().await = fail;
    }

    async fn record_message(&self, item: SentItem) -> Result<(), TransportError> {
        if *self.fail_messages.read().await {
            return Err(TransportError::ConnectionFailed(
                "mock message failure".to_string(),
            ));
        }
        self.sent.write().await.push(item);
        Ok(())
    }

    async fn record_upload(&self, item: SentItem) -> Result<(), TransportError> {
        *self.upload_attempts.write().await += 1;
        if *self.fail_uploads.read().await {
            return Err(TransportError::Api {
                retcode: 1200,
                message: "mock upload failure".to_string(),
            });
        }
        self.sent.write().await.push(item);
        Ok(())
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_private_message(
        &self,
        user_id: i64,
        message: &str,
    ) -> Result<(), TransportError> {
        self.record_message(SentItem::PrivateMessage {
            user_id,
            text: message.to_string(),
        })
        .await
    }

    async fn send_group_message(&self, group_id: i64, message: &str) -> Result<(), TransportError> {
        self.record_message(SentItem::GroupMessage {
            group_id,
            text: message.to_string(),
        })
        .await
    }

    async fn upload_private_file(
        &self,
        user_id: i64,
        path: &Path,
        name: &str,
    ) -> Result<(), TransportError> {
        self.record_upload(SentItem::PrivateFile {
            user_id,
            path: path.to_path_buf(),
            name: name.to_string(),
        })
        .await
    }

    async fn upload_group_file(
        &self,
        group_id: i64,
        path: &Path,
        name: &str,
    ) -> Result<(), TransportError> {
        self.record_upload(SentItem::GroupFile {
            group_id,
            path: path.to_path_buf(),
            name: name.to_string(),
        })
        .await
    }
}
