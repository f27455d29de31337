//! Per-command request data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where replies for a command go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyTarget {
    /// One-to-one chat with the requester.
    Direct { user_id: i64 },
    /// A group chat; replies mention the requester.
    Group { group_id: i64 },
}

impl ReplyTarget {
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }
}

/// Everything replies for one inbound command need. Lives only as long as the
/// tasks spawned for that command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Correlates every log line and task of one command.
    pub request_id: Uuid,
    /// Who sent the command.
    pub user_id: i64,
    pub target: ReplyTarget,
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    /// Command received in a direct chat.
    pub fn direct(user_id: i64) -> Self {
        Self::new(user_id, ReplyTarget::Direct { user_id })
    }

    /// Command received in a group chat.
    pub fn group(group_id: i64, user_id: i64) -> Self {
        Self::new(user_id, ReplyTarget::Group { group_id })
    }

    fn new(user_id: i64, target: ReplyTarget) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            user_id,
            target,
            received_at: Utc::now(),
        }
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            ReplyTarget::Direct { user_id } => write!(f, "direct:{}", user_id),
            ReplyTarget::Group { group_id } => write!(f, "group:{}/{}", group_id, self.user_id),
        }
    }
}
