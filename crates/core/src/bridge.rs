//! Offloading of blocking library calls.
//!
//! Every call into the content library (login check, search, download, cache
//! index walk) is synchronous and may run for minutes. `BlockingBridge` is the
//! single place those calls leave the async scheduler: the closure runs on
//! tokio's blocking pool and the calling task is suspended until it returns,
//! so other orchestration tasks and the inbound listener keep running.

use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

/// Errors raised by the bridge itself, never by the offloaded call.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The blocking call panicked on its worker thread.
    #[error("blocking call '{operation}' panicked: {message}")]
    Panicked { operation: String, message: String },

    /// The worker was cancelled before finishing (runtime shutting down).
    #[error("blocking call '{operation}' was cancelled")]
    Cancelled { operation: String },
}

/// Runs blocking closures off the async scheduler.
///
/// No timeout is applied here; callers that need one wrap the returned
/// future in `tokio::time::timeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingBridge;

impl BlockingBridge {
    pub fn new() -> Self {
        Self
    }

    /// Run `call` on the blocking pool and await its result.
    ///
    /// `operation` names the call in errors and logs.
    pub async fn run<F, T>(&self, operation: &str, call: F) -> Result<T, BridgeError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(call)
            .await
            .map_err(|e| join_error(operation, e))
    }
}

fn join_error(operation: &str, err: JoinError) -> BridgeError {
    if err.is_panic() {
        let payload = err.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        error!(operation, %message, "Blocking call panicked");
        BridgeError::Panicked {
            operation: operation.to_string(),
            message,
        }
    } else {
        BridgeError::Cancelled {
            operation: operation.to_string(),
        }
    }
}
