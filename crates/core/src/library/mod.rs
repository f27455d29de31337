//! Content library abstraction.
//!
//! The retrieval library itself (crawling, login, packaging) lives outside
//! this crate. This module defines the blocking seams the orchestrator talks
//! to and two concrete implementations: a helper-process library and a
//! directory-walking cache index.

mod cache_index;
mod subprocess;
mod traits;
mod types;

pub use cache_index::DirectoryCacheIndex;
pub use subprocess::SubprocessLibrary;
pub use traits::{CacheIndex, ContentLibrary};
pub use types::*;
