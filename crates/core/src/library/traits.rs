//! Seams to the content library.
//!
//! Both traits are deliberately synchronous: implementations do blocking
//! network and disk work, and callers reach them only through
//! [`BlockingBridge`](crate::bridge::BlockingBridge).

use super::types::{CacheIndexResult, FetchOutcome, LibraryError, LoginStatus, SearchOutcome};

/// The third-party retrieval library.
pub trait ContentLibrary: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Check whether the library's session is logged in.
    fn check_login(&self) -> Result<LoginStatus, LibraryError>;

    /// Search albums by keyword.
    fn search_album(&self, keyword: &str) -> Result<SearchOutcome, LibraryError>;

    /// Download and package one album.
    fn download_album(&self, album_id: &str) -> Result<FetchOutcome, LibraryError>;
}

/// The library's local index of already-downloaded files.
pub trait CacheIndex: Send + Sync {
    fn search_cache(&self, album_id: &str) -> CacheIndexResult;
}
