//! Cache-before-fetch lookup of finished artifacts.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::bridge::{BlockingBridge, BridgeError};
use crate::config::OutputConfig;
use crate::library::CacheIndex;

/// Which lookup tier produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    /// `<download_dir>/<id>.<ext>` existed.
    DirectPath,
    /// Found by scanning the cache index.
    Index,
}

impl HitSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectPath => "direct_path",
            Self::Index => "index",
        }
    }
}

/// Outcome of one cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit { path: PathBuf, source: HitSource },
    Miss,
}

impl CacheLookup {
    pub fn found(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Hit { path, .. } => Some(path),
            Self::Miss => None,
        }
    }
}

/// Two-tier artifact lookup: an existence check on the expected path first,
/// then the (slower) cache index.
pub struct CacheLocator {
    output: OutputConfig,
    index: Arc<dyn CacheIndex>,
    bridge: BlockingBridge,
}

impl CacheLocator {
    pub fn new(output: OutputConfig, index: Arc<dyn CacheIndex>, bridge: BlockingBridge) -> Self {
        Self {
            output,
            index,
            bridge,
        }
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub async fn locate(&self, album_id: &str) -> Result<CacheLookup, BridgeError> {
        let expected = self.output.expected_path(album_id);
        if tokio::fs::try_exists(&expected).await.unwrap_or(false) {
            debug!(album_id, path = %expected.display(), "Cache hit on expected path");
            return Ok(CacheLookup::Hit {
                path: expected,
                source: HitSource::DirectPath,
            });
        }

        let index = Arc::clone(&self.index);
        let id = album_id.to_string();
        let result = self
            .bridge
            .run("search_cache", move || index.search_cache(&id))
            .await?;

        if !result.ok {
            debug!(album_id, "Cache index reported no results");
            return Ok(CacheLookup::Miss);
        }

        let artifact_name = self.output.artifact_name(album_id);
        let found = result
            .file_list
            .into_iter()
            .find(|path| path.file_name() == Some(OsStr::new(&artifact_name)));

        Ok(match found {
            Some(path) => {
                debug!(album_id, path = %path.display(), "Cache hit via index");
                CacheLookup::Hit {
                    path,
                    source: HitSource::Index,
                }
            }
            None => CacheLookup::Miss,
        })
    }
}
