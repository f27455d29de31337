//! Mock content library for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::library::{
    ContentLibrary, FetchOutcome, LibraryError, LoginStatus, SearchOutcome,
};

/// A download handler producing the outcome for one album id.
type DownloadHandler = Arc<dyn Fn() -> Result<FetchOutcome, LibraryError> + Send + Sync>;

/// Mock implementation of the [`ContentLibrary`] trait.
///
/// Provides controllable behavior for testing:
/// - Per-album download outcomes, fixed or computed by a closure
/// - Configurable search and login responses
/// - Recording of every download and search for assertions
///
/// Handlers run outside the internal lock, so a handler that panics does
/// not poison the mock for sibling calls.
pub struct MockLibrary {
    handlers: Mutex<HashMap<String, DownloadHandler>>,
    downloads: Mutex<Vec<String>>,
    searches: Mutex<Vec<String>>,
    search: Mutex<Result<SearchOutcome, String>>,
    login: Mutex<Result<LoginStatus, String>>,
}

impl std::fmt::Debug for MockLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLibrary")
            .field("handlers", &"<handlers>")
            .field("downloads", &self.downloads())
            .field("searches", &self.searches())
            .finish()
    }
}

impl Default for MockLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLibrary {
    /// Create a mock with no configured albums, an empty search result and
    /// a logged-out account.
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            downloads: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
            search: Mutex::new(Ok(SearchOutcome {
                ok: true,
                msg: String::new(),
                album_list: Vec::new(),
            })),
            login: Mutex::new(Ok(LoginStatus::default())),
        }
    }

    /// Return `outcome` for every download of `album_id`.
    pub fn set_download(&self, album_id: &str, outcome: FetchOutcome) {
        self.set_download_with(album_id, move || Ok(outcome.clone()));
    }

    /// Compute the download result for `album_id` with `handler`.
    pub fn set_download_with<F>(&self, album_id: &str, handler: F)
    where
        F: Fn() -> Result<FetchOutcome, LibraryError> + Send + Sync + 'static,
    {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.insert(album_id.to_string(), Arc::new(handler));
        }
    }

    pub fn set_search(&self, outcome: SearchOutcome) {
        if let Ok(mut search) = self.search.lock() {
            *search = Ok(outcome);
        }
    }

    /// Make every search fail with a decode error carrying `message`.
    pub fn set_search_error(&self, message: &str) {
        if let Ok(mut search) = self.search.lock() {
            *search = Err(message.to_string());
        }
    }

    pub fn set_login(&self, status: LoginStatus) {
        if let Ok(mut login) = self.login.lock() {
            *login = Ok(status);
        }
    }

    /// Make every login check fail with a decode error carrying `message`.
    pub fn set_login_error(&self, message: &str) {
        if let Ok(mut login) = self.login.lock() {
            *login = Err(message.to_string());
        }
    }

    /// Album ids passed to `download_album`, in call order.
    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Keywords passed to `search_album`, in call order.
    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ContentLibrary for MockLibrary {
    fn name(&self) -> &str {
        "mock"
    }

    fn check_login(&self) -> Result<LoginStatus, LibraryError> {
        match self.login.lock() {
            Ok(login) => login.clone().map_err(LibraryError::Decode),
            Err(_) => Err(LibraryError::Decode("mock poisoned".to_string())),
        }
    }

    fn search_album(&self, keyword: &str) -> Result<SearchOutcome, LibraryError> {
        if let Ok(mut searches) = self.searches.lock() {
            searches.push(keyword.to_string());
        }
        match self.search.lock() {
            Ok(search) => search.clone().map_err(LibraryError::Decode),
            Err(_) => Err(LibraryError::Decode("mock poisoned".to_string())),
        }
    }

    fn download_album(&self, album_id: &str) -> Result<FetchOutcome, LibraryError> {
        if let Ok(mut downloads) = self.downloads.lock() {
            downloads.push(album_id.to_string());
        }
        let handler = self
            .handlers
            .lock()
            .ok()
            .and_then(|handlers| handlers.get(album_id).cloned());
        match handler {
            Some(handler) => handler(),
            None => Ok(FetchOutcome::failure(format!(
                "Album {} not found in mock library",
                album_id
            ))),
        }
    }
}
