//! Inbound OneBot v11 event payloads.

use albumdrop_core::RequestContext;
use serde::Deserialize;

/// An event posted by the bot host. Only message events are acted on.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "post_type", rename_all = "snake_case")]
pub enum Event {
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Private,
    Group,
}

/// A chat message addressed to the bot.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    pub message_type: MessageType,
    pub user_id: i64,
    #[serde(default)]
    pub group_id: Option<i64>,
    /// Message text with CQ codes inline.
    #[serde(default)]
    pub raw_message: String,
}

impl MessageEvent {
    /// Build the reply context. `None` for a group message without a group id.
    pub fn context(&self) -> Option<RequestContext> {
        match self.message_type {
            MessageType::Private => Some(RequestContext::direct(self.user_id)),
            MessageType::Group => self
                .group_id
                .map(|group_id| RequestContext::group(group_id, self.user_id)),
        }
    }
}
