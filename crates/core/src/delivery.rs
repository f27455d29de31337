//! Replies and artifact hand-off to the messaging transport.

use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::context::{ReplyTarget, RequestContext};
use crate::messages;
use crate::metrics::DELIVERIES;
use crate::transport::{Transport, TransportError};

/// How a delivery attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    /// The file was handed to the transport and the requester notified.
    Delivered { file_name: String },
    /// The transport rejected the upload; the artifact stays on disk.
    Failed { reason: String },
}

/// Routes replies and uploads to the right chat for a request.
#[derive(Clone)]
pub struct DeliveryNotifier {
    transport: Arc<dyn Transport>,
}

impl DeliveryNotifier {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a text reply. Failures are logged and swallowed: a lost reply
    /// must never abort the work it reports on.
    pub async fn reply(&self, ctx: &RequestContext, text: &str) {
        let result = match ctx.target {
            ReplyTarget::Group { group_id } => {
                self.transport.send_group_message(group_id, text).await
            }
            ReplyTarget::Direct { user_id } => {
                self.transport.send_private_message(user_id, text).await
            }
        };
        if let Err(e) = result {
            warn!(
                request_id = %ctx.request_id,
                target = %ctx,
                transport = self.transport.name(),
                "Failed to send reply: {}",
                e
            );
        }
    }

    /// Upload `path` for `album_id` and notify the requester of the result.
    /// No retry on failure.
    pub async fn deliver(&self, ctx: &RequestContext, path: &Path, album_id: &str) -> DeliveryReport {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| album_id.to_string());

        match self.upload(ctx, path, &file_name).await {
            Ok(()) => {
                info!(
                    request_id = %ctx.request_id,
                    album_id,
                    path = %path.display(),
                    "Artifact delivered"
                );
                DELIVERIES.with_label_values(&["delivered"]).inc();
                self.reply(ctx, &messages::mentioned(ctx, &messages::delivered(album_id, &file_name)))
                    .await;
                DeliveryReport::Delivered { file_name }
            }
            Err(e) => {
                error!(
                    request_id = %ctx.request_id,
                    album_id,
                    file_name = %file_name,
                    "Failed to send file: {}",
                    e
                );
                DELIVERIES.with_label_values(&["failed"]).inc();
                self.reply(ctx, &messages::delivery_failed(album_id, &e)).await;
                DeliveryReport::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn upload(&self, ctx: &RequestContext, path: &Path, name: &str) -> Result<(), TransportError> {
        match ctx.target {
            ReplyTarget::Group { group_id } => {
                self.transport.upload_group_file(group_id, path, name).await
            }
            ReplyTarget::Direct { user_id } => {
                self.transport.upload_private_file(user_id, path, name).await
            }
        }
    }
}
