//! Types for the download orchestrator.

use std::path::PathBuf;
use thiserror::Error;

use crate::bridge::BridgeError;
use crate::delivery::DeliveryReport;
use crate::library::LibraryError;

/// Errors that abort one orchestration run. Caught at the task boundary.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The library call itself failed (helper crashed, bad output, ...).
    #[error("library error: {0}")]
    Library(#[from] LibraryError),

    /// The blocking worker panicked or was cancelled.
    #[error("blocking call failed: {0}")]
    Bridge(#[from] BridgeError),
}

/// Terminal state of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationOutcome {
    /// Served from the local cache without fetching.
    Cached {
        path: PathBuf,
        delivery: DeliveryReport,
    },
    /// Fetched, resolved and handed to delivery.
    Downloaded {
        path: PathBuf,
        delivery: DeliveryReport,
    },
    /// The library reported `ok = false`.
    FetchFailed { message: String },
    /// The fetch succeeded but no artifact exists where it should.
    PackagingFailed { expected: PathBuf },
    /// Any other error, reported to the requester generically.
    Errored { error: String },
}

impl OrchestrationOutcome {
    /// Label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cached { .. } => "cached",
            Self::Downloaded { .. } => "downloaded",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::PackagingFailed { .. } => "packaging_failed",
            Self::Errored { .. } => "errored",
        }
    }

    /// Whether the artifact reached the requester.
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            Self::Cached {
                delivery: DeliveryReport::Delivered { .. },
                ..
            } | Self::Downloaded {
                delivery: DeliveryReport::Delivered { .. },
                ..
            }
        )
    }
}
