//! Per-album download orchestration.
//!
//! One run per album id: cache check, fetch on miss, validation, path
//! resolution, delivery. Runs are independent; a failing run is reported to
//! its requester and never affects siblings.

mod runner;
mod types;

pub use runner::DownloadOrchestrator;
pub use types::{OrchestrationOutcome, OrchestratorError};
