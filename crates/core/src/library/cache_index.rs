//! Local cache index over the download directory.

use std::ffi::OsStr;
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::traits::CacheIndex;
use super::types::CacheIndexResult;

/// [`CacheIndex`] that walks the download directory.
///
/// Reports every regular file whose stem is exactly the album id, so `12`
/// never matches `112.pdf`. Picking the packaged artifact out of that list is
/// the caller's job.
pub struct DirectoryCacheIndex {
    root: PathBuf,
    max_depth: usize,
}

impl DirectoryCacheIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: 4,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl CacheIndex for DirectoryCacheIndex {
    fn search_cache(&self, album_id: &str) -> CacheIndexResult {
        if !self.root.is_dir() {
            debug!(root = %self.root.display(), "Cache root missing");
            return CacheIndexResult::default();
        }

        let mut file_list = Vec::new();
        for entry in WalkDir::new(&self.root).max_depth(self.max_depth) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %self.root.display(), "Skipping unreadable cache entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file()
                && entry.path().file_stem() == Some(OsStr::new(album_id))
            {
                file_list.push(entry.into_path());
            }
        }
        file_list.sort();

        CacheIndexResult {
            ok: true,
            file_list,
        }
    }
}
