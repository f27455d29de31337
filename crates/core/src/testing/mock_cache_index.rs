//! Mock cache index for testing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::library::{CacheIndex, CacheIndexResult};

/// In-memory [`CacheIndex`] keyed by album id.
///
/// Unknown ids report `ok = false`, like an index that found nothing.
#[derive(Debug, Default)]
pub struct MockCacheIndex {
    files: Mutex<HashMap<String, Vec<PathBuf>>>,
    searches: AtomicUsize,
}

impl MockCacheIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files the index reports for `album_id`.
    pub fn set_files(&self, album_id: &str, files: Vec<PathBuf>) {
        if let Ok(mut map) = self.files.lock() {
            map.insert(album_id.to_string(), files);
        }
    }

    /// Number of `search_cache` calls made so far.
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

impl CacheIndex for MockCacheIndex {
    fn search_cache(&self, album_id: &str) -> CacheIndexResult {
        self.searches.fetch_add(1, Ordering::SeqCst);
        let files = self
            .files
            .lock()
            .ok()
            .and_then(|map| map.get(album_id).cloned());
        match files {
            Some(file_list) => CacheIndexResult {
                ok: !file_list.is_empty(),
                file_list,
            },
            None => CacheIndexResult::default(),
        }
    }
}
