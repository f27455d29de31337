//! Types exchanged with the content library.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::bridge::BridgeError;

/// Result of a login check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginStatus {
    pub is_login: bool,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub vip: bool,
    /// Failure reason when not logged in.
    #[serde(default)]
    pub msg: String,
}

/// One album as listed by a search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author_list: Vec<String>,
}

/// Result of a keyword search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub ok: bool,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub album_list: Vec<AlbumSummary>,
}

/// Result of a download call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub ok: bool,
    pub message: String,
    path: Option<PathBuf>,
}

impl FetchOutcome {
    pub fn success(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            path,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            path: None,
        }
    }

    /// Build from the raw fields the library reported.
    pub fn from_parts(ok: bool, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            ok,
            message: message.into(),
            path,
        }
    }

    /// Path the library says it produced. Always `None` for a failed fetch,
    /// whatever the library put in the field.
    pub fn resolved_path(&self) -> Option<&Path> {
        if self.ok {
            self.path.as_deref()
        } else {
            None
        }
    }
}

/// Result of a local cache index lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheIndexResult {
    pub ok: bool,
    pub file_list: Vec<PathBuf>,
}

/// Errors raised while talking to the content library.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to start library helper '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("library helper exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("failed to decode library helper output: {0}")]
    Decode(String),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
