//! Testing utilities and mock implementations.
//!
//! Mocks for every seam the orchestration layer talks through, so the
//! dispatcher and orchestrator can be exercised without a helper process,
//! a chat host or a real task runtime policy.
//!
//! # Example
//!
//! ```rust,ignore
//! use albumdrop_core::testing::{MockLibrary, MockTransport, RecordingSpawner};
//!
//! let library = MockLibrary::new();
//! library.set_download("350234", FetchOutcome::success("ok", None));
//!
//! // Wire into a RequestDispatcher, handle a message, then:
//! spawner.run_all().await;
//! assert_eq!(library.downloads(), vec!["350234"]);
//! ```

mod mock_cache_index;
mod mock_library;
mod mock_transport;
mod recording_spawner;

pub use mock_cache_index::MockCacheIndex;
pub use mock_library::MockLibrary;
pub use mock_transport::{MockTransport, SentItem};
pub use recording_spawner::RecordingSpawner;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::library::{AlbumSummary, LoginStatus};

    /// An album summary with one author.
    pub fn album(id: &str, title: &str, author: &str) -> AlbumSummary {
        AlbumSummary {
            id: id.to_string(),
            title: title.to_string(),
            author_list: vec![author.to_string()],
        }
    }

    /// `count` numbered albums starting at id 1001.
    pub fn albums(count: usize) -> Vec<AlbumSummary> {
        (1..=count)
            .map(|i| album(&(1000 + i).to_string(), &format!("Title {}", i), &format!("Author {}", i)))
            .collect()
    }

    /// A logged-in account.
    pub fn logged_in(username: &str) -> LoginStatus {
        LoginStatus {
            is_login: true,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            vip: false,
            msg: String::new(),
        }
    }
}
