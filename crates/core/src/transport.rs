//! Messaging host abstraction.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors reported by a messaging transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport connection failed: {0}")]
    ConnectionFailed(String),

    #[error("transport request timed out")]
    Timeout,

    #[error("transport API error (retcode {retcode}): {message}")]
    Api { retcode: i64, message: String },

    #[error("failed to decode transport response: {0}")]
    Decode(String),
}

/// Outbound side of the messaging host.
///
/// Every call is scoped either to one user (direct chat) or to one group.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &str;

    async fn send_private_message(&self, user_id: i64, message: &str)
        -> Result<(), TransportError>;

    async fn send_group_message(&self, group_id: i64, message: &str) -> Result<(), TransportError>;

    /// Send a local file to a user as an attachment named `name`.
    async fn upload_private_file(
        &self,
        user_id: i64,
        path: &Path,
        name: &str,
    ) -> Result<(), TransportError>;

    /// Upload a local file into a group's file area under `name`.
    async fn upload_group_file(
        &self,
        group_id: i64,
        path: &Path,
        name: &str,
    ) -> Result<(), TransportError>;
}
