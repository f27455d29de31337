//! Download orchestrator implementation.
//!
//! Drives one album id through the workflow:
//! - Cache check (direct path, then cache index)
//! - Fetch through the blocking bridge on a miss
//! - Result validation and artifact path resolution
//! - Delivery and requester notification
//!
//! Every run ends in exactly one [`OrchestrationOutcome`]; nothing is retried.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::bridge::BlockingBridge;
use crate::cache::{CacheLocator, CacheLookup};
use crate::context::RequestContext;
use crate::delivery::DeliveryNotifier;
use crate::library::{ContentLibrary, FetchOutcome};
use crate::messages;
use crate::metrics::{CACHE_LOOKUPS, FETCHES, FETCH_DURATION, ORCHESTRATION_OUTCOMES};

use super::types::{OrchestrationOutcome, OrchestratorError};

/// Per-album workflow runner, shared by all tasks.
pub struct DownloadOrchestrator {
    locator: CacheLocator,
    library: Arc<dyn ContentLibrary>,
    bridge: BlockingBridge,
    notifier: DeliveryNotifier,
}

impl DownloadOrchestrator {
    pub fn new(
        locator: CacheLocator,
        library: Arc<dyn ContentLibrary>,
        bridge: BlockingBridge,
        notifier: DeliveryNotifier,
    ) -> Self {
        Self {
            locator,
            library,
            bridge,
            notifier,
        }
    }

    /// Run the workflow for one album. Never fails: errors are logged,
    /// reported to the requester and folded into the outcome.
    pub async fn run(&self, ctx: &RequestContext, album_id: &str) -> OrchestrationOutcome {
        let outcome = match self.try_run(ctx, album_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    request_id = %ctx.request_id,
                    target = %ctx,
                    album_id,
                    "Unexpected error while processing album: {}",
                    e
                );
                self.notifier
                    .reply(ctx, &messages::processing_error(album_id, &e))
                    .await;
                OrchestrationOutcome::Errored {
                    error: e.to_string(),
                }
            }
        };

        ORCHESTRATION_OUTCOMES
            .with_label_values(&[outcome.label()])
            .inc();
        outcome
    }

    async fn try_run(
        &self,
        ctx: &RequestContext,
        album_id: &str,
    ) -> Result<OrchestrationOutcome, OrchestratorError> {
        info!(request_id = %ctx.request_id, album_id, "Searching local cache");

        if let CacheLookup::Hit { path, source } = self.locator.locate(album_id).await? {
            CACHE_LOOKUPS.with_label_values(&[source.as_str()]).inc();
            info!(
                request_id = %ctx.request_id,
                album_id,
                path = %path.display(),
                source = source.as_str(),
                "Cache hit"
            );
            self.notifier.reply(ctx, &messages::cache_hit(album_id)).await;
            let delivery = self.notifier.deliver(ctx, &path, album_id).await;
            return Ok(OrchestrationOutcome::Cached { path, delivery });
        }
        CACHE_LOOKUPS.with_label_values(&["miss"]).inc();

        info!(request_id = %ctx.request_id, album_id, "Cache miss, starting download");
        self.notifier
            .reply(ctx, &messages::fetch_started(album_id))
            .await;

        let fetched = self.fetch(album_id).await?;

        if !fetched.ok {
            warn!(
                request_id = %ctx.request_id,
                album_id,
                message = %fetched.message,
                "Download failed"
            );
            self.notifier
                .reply(ctx, &messages::fetch_failed(album_id, &fetched.message))
                .await;
            return Ok(OrchestrationOutcome::FetchFailed {
                message: fetched.message,
            });
        }

        let path = match self.resolve_path(album_id, &fetched).await {
            Ok(path) => path,
            Err(expected) => {
                error!(
                    request_id = %ctx.request_id,
                    album_id,
                    expected = %expected.display(),
                    "Artifact was not produced at the expected location"
                );
                self.notifier
                    .reply(ctx, &messages::packaging_failed(album_id))
                    .await;
                return Ok(OrchestrationOutcome::PackagingFailed { expected });
            }
        };

        info!(
            request_id = %ctx.request_id,
            album_id,
            path = %path.display(),
            "Download complete"
        );
        let delivery = self.notifier.deliver(ctx, &path, album_id).await;
        Ok(OrchestrationOutcome::Downloaded { path, delivery })
    }

    /// Call the library's download through the bridge.
    async fn fetch(&self, album_id: &str) -> Result<FetchOutcome, OrchestratorError> {
        let library = Arc::clone(&self.library);
        let id = album_id.to_string();
        let started = Instant::now();

        let result = self
            .bridge
            .run("download_album", move || library.download_album(&id))
            .await
            .map_err(OrchestratorError::from)
            .and_then(|r| r.map_err(OrchestratorError::from));

        let label = match &result {
            Ok(outcome) if outcome.ok => "ok",
            Ok(_) => "failed",
            Err(_) => "error",
        };
        FETCHES.with_label_values(&[label]).inc();
        FETCH_DURATION
            .with_label_values(&[label])
            .observe(started.elapsed().as_secs_f64());

        result
    }

    /// Pick the artifact path for a successful fetch.
    ///
    /// Trusts the library's path when it carries the artifact extension,
    /// otherwise falls back to the expected path, which must exist.
    /// `Err` carries the fallback path that was missing.
    async fn resolve_path(&self, album_id: &str, fetched: &FetchOutcome) -> Result<PathBuf, PathBuf> {
        let output = self.locator.output();

        match fetched.resolved_path() {
            Some(path) if output.has_artifact_extension(path) => return Ok(path.to_path_buf()),
            reported => warn!(
                album_id,
                reported = ?reported,
                "Library reported an unexpected artifact path, using expected location"
            ),
        }

        let expected = output.expected_path(album_id);
        if tokio::fs::try_exists(&expected).await.unwrap_or(false) {
            Ok(expected)
        } else {
            Err(expected)
        }
    }
}
