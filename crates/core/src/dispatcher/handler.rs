//! Request dispatcher implementation.

use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info};

use crate::bridge::BlockingBridge;
use crate::context::RequestContext;
use crate::delivery::DeliveryNotifier;
use crate::library::{ContentLibrary, LibraryError};
use crate::messages;
use crate::metrics::{COMMANDS_RECEIVED, TASKS_SPAWNED};
use crate::orchestrator::DownloadOrchestrator;

use super::command::{parse_command, Command};
use super::spawner::TaskSpawner;

/// What the dispatcher did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a command.
    Ignored,
    /// A command failed validation; the requester was told why.
    Rejected,
    /// One orchestration task spawned per album id.
    Spawned { tasks: usize },
    /// A search ran and its result was replied.
    Searched,
    /// A login check ran and its result was replied.
    StatusReported,
}

/// Entry point for inbound chat messages.
pub struct RequestDispatcher {
    orchestrator: Arc<DownloadOrchestrator>,
    library: Arc<dyn ContentLibrary>,
    bridge: BlockingBridge,
    notifier: DeliveryNotifier,
    spawner: Arc<dyn TaskSpawner>,
}

impl RequestDispatcher {
    pub fn new(
        orchestrator: Arc<DownloadOrchestrator>,
        library: Arc<dyn ContentLibrary>,
        bridge: BlockingBridge,
        notifier: DeliveryNotifier,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Self {
        Self {
            orchestrator,
            library,
            bridge,
            notifier,
            spawner,
        }
    }

    /// Handle one message. Fetch commands return as soon as their tasks are
    /// spawned; search and status commands return once their reply is sent.
    pub async fn handle(&self, ctx: RequestContext, text: &str) -> Dispatch {
        let Some(command) = parse_command(text) else {
            debug!(request_id = %ctx.request_id, "Ignoring non-command message");
            return Dispatch::Ignored;
        };

        info!(
            request_id = %ctx.request_id,
            target = %ctx,
            command = command.kind(),
            "Command received"
        );
        COMMANDS_RECEIVED.with_label_values(&[command.kind()]).inc();

        match command {
            Command::Fetch { album_ids } => self.fetch(ctx, album_ids).await,
            Command::Search { keyword } => self.search(&ctx, keyword).await,
            Command::Status => self.status(&ctx).await,
        }
    }

    async fn fetch(&self, ctx: RequestContext, album_ids: Vec<String>) -> Dispatch {
        if album_ids.is_empty() {
            COMMANDS_RECEIVED.with_label_values(&["rejected"]).inc();
            self.notifier
                .reply(&ctx, &messages::mentioned(&ctx, messages::no_album_ids()))
                .await;
            return Dispatch::Rejected;
        }

        let tasks = album_ids.len();
        self.notifier
            .reply(&ctx, &messages::mentioned(&ctx, &messages::received(tasks)))
            .await;

        for album_id in album_ids {
            let orchestrator = Arc::clone(&self.orchestrator);
            let ctx = ctx.clone();
            self.spawner.spawn(
                async move {
                    orchestrator.run(&ctx, &album_id).await;
                }
                .boxed(),
            );
        }
        TASKS_SPAWNED.inc_by(tasks as u64);

        Dispatch::Spawned { tasks }
    }

    async fn search(&self, ctx: &RequestContext, keyword: String) -> Dispatch {
        if keyword.is_empty() {
            COMMANDS_RECEIVED.with_label_values(&["rejected"]).inc();
            self.notifier.reply(ctx, messages::search_usage()).await;
            return Dispatch::Rejected;
        }

        self.notifier
            .reply(ctx, &messages::mentioned(ctx, &messages::searching(&keyword)))
            .await;

        let library = Arc::clone(&self.library);
        let query = keyword.clone();
        let result = self
            .bridge
            .run("search_album", move || library.search_album(&query))
            .await
            .map_err(LibraryError::from)
            .and_then(|r| r);

        let reply = match result {
            Err(e) => {
                error!(request_id = %ctx.request_id, keyword = %keyword, "Search failed: {}", e);
                messages::mentioned(ctx, &messages::search_failed(&e))
            }
            Ok(outcome) if !outcome.ok => {
                messages::mentioned(ctx, &messages::search_failed(&outcome.msg))
            }
            Ok(outcome) if outcome.album_list.is_empty() => {
                messages::mentioned(ctx, &messages::search_empty(&keyword))
            }
            Ok(outcome) => {
                let results = messages::search_results(&keyword, &outcome.album_list);
                format!("{}\n{}", messages::at_user(ctx), results)
                    .trim()
                    .to_string()
            }
        };
        self.notifier.reply(ctx, &reply).await;

        Dispatch::Searched
    }

    async fn status(&self, ctx: &RequestContext) -> Dispatch {
        self.notifier
            .reply(ctx, &messages::mentioned(ctx, messages::checking_login()))
            .await;

        let library = Arc::clone(&self.library);
        let result = self
            .bridge
            .run("check_login", move || library.check_login())
            .await
            .map_err(LibraryError::from)
            .and_then(|r| r);

        let reply = match result {
            Ok(status) => messages::login_status(&status),
            Err(e) => {
                error!(request_id = %ctx.request_id, "Login check failed: {}", e);
                messages::login_check_failed(&e)
            }
        };
        self.notifier
            .reply(ctx, &messages::mentioned(ctx, &reply))
            .await;

        Dispatch::StatusReported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheLocator;
    use crate::config::OutputConfig;
    use crate::library::{FetchOutcome, LoginStatus, SearchOutcome};
    use crate::testing::fixtures::{albums, logged_in};
    use crate::testing::{MockCacheIndex, MockLibrary, MockTransport, RecordingSpawner, SentItem};
    use std::fs;
    use tempfile::TempDir;

    struct Harness {
        dir: TempDir,
        library: Arc<MockLibrary>,
        transport: Arc<MockTransport>,
        spawner: Arc<RecordingSpawner>,
        dispatcher: RequestDispatcher,
    }

    fn harness() -> Harness {
        let dir = TempDir::new().unwrap();
        let library = Arc::new(MockLibrary::new());
        let transport = Arc::new(MockTransport::new());
        let spawner = Arc::new(RecordingSpawner::new());
        let bridge = BlockingBridge::new();
        let notifier = DeliveryNotifier::new(transport.clone());
        let output = OutputConfig {
            download_dir: dir.path().to_path_buf(),
            extension: "pdf".to_string(),
        };
        let orchestrator = Arc::new(DownloadOrchestrator::new(
            CacheLocator::new(output, Arc::new(MockCacheIndex::new()), bridge),
            library.clone(),
            bridge,
            notifier.clone(),
        ));
        let dispatcher = RequestDispatcher::new(
            orchestrator,
            library.clone(),
            bridge,
            notifier,
            spawner.clone(),
        );
        Harness {
            dir,
            library,
            transport,
            spawner,
            dispatcher,
        }
    }

    #[tokio::test]
    async fn test_non_command_is_ignored() {
        let h = harness();
        let result = h.dispatcher.handle(RequestContext::direct(1), "hi").await;
        assert_eq!(result, Dispatch::Ignored);
        assert!(h.transport.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_without_ids_is_rejected() {
        let h = harness();
        let result = h
            .dispatcher
            .handle(RequestContext::group(5, 1), "/jm nothing here")
            .await;

        assert_eq!(result, Dispatch::Rejected);
        assert_eq!(h.spawner.pending(), 0);
        let texts = h.transport.texts().await;
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("[CQ:at,qq=1]"));
        assert!(texts[0].contains("at least one valid album ID"));
    }

    #[tokio::test]
    async fn test_fetch_spawns_one_task_per_occurrence_without_running_them() {
        let h = harness();
        let result = h
            .dispatcher
            .handle(RequestContext::direct(1), "/jm 123 456 123")
            .await;

        assert_eq!(result, Dispatch::Spawned { tasks: 3 });
        assert_eq!(h.spawner.pending(), 3);
        // Only the acknowledgement went out; no task has started yet
        assert_eq!(h.transport.texts().await, vec![messages::received(3)]);
        assert!(h.library.downloads().is_empty());

        h.spawner.run_all().await;

        let mut downloads = h.library.downloads();
        downloads.sort();
        assert_eq!(downloads, vec!["123", "123", "456"]);
    }

    #[tokio::test]
    async fn test_fetch_scenario_end_to_end() {
        let h = harness();
        let produced = h.dir.path().join("350234.pdf");
        h.library
            .set_download("350234", FetchOutcome::success("ok", Some(produced.clone())));

        let result = h
            .dispatcher
            .handle(RequestContext::direct(1), "/jm 350234")
            .await;
        assert_eq!(result, Dispatch::Spawned { tasks: 1 });
        h.spawner.run_all().await;

        assert_eq!(h.library.downloads(), vec!["350234"]);
        let sent = h.transport.sent().await;
        assert!(sent[0].text().unwrap().contains('1'));
        assert!(sent.contains(&SentItem::PrivateFile {
            user_id: 1,
            path: produced,
            name: "350234.pdf".to_string(),
        }));
        assert!(sent.last().unwrap().text().unwrap().contains("350234"));
    }

    #[tokio::test]
    async fn test_failing_task_does_not_affect_siblings() {
        let h = harness();
        let good = h.dir.path().join("2.pdf");
        fs::write(&good, b"pdf").unwrap();
        h.library.set_download_with("1", || panic!("library crashed"));

        h.dispatcher
            .handle(RequestContext::direct(1), "/jm 1 2")
            .await;
        h.spawner.run_all().await;

        assert_eq!(h.transport.uploaded_paths().await, vec![good]);
        let texts = h.transport.texts().await;
        assert!(texts.iter().any(|t| t.contains("serious error occurred while processing 1")));
    }

    #[tokio::test]
    async fn test_search_without_keyword_is_rejected() {
        let h = harness();
        let result = h
            .dispatcher
            .handle(RequestContext::direct(1), "/jm_search   ")
            .await;

        assert_eq!(result, Dispatch::Rejected);
        assert_eq!(h.transport.texts().await, vec![messages::search_usage()]);
        assert!(h.library.searches().is_empty());
    }

    #[tokio::test]
    async fn test_search_shows_five_results_and_hint() {
        let h = harness();
        h.library.set_search(SearchOutcome {
            ok: true,
            msg: String::new(),
            album_list: albums(7),
        });

        let result = h
            .dispatcher
            .handle(RequestContext::direct(1), "/jm_search abc")
            .await;

        assert_eq!(result, Dispatch::Searched);
        assert_eq!(h.library.searches(), vec!["abc"]);
        assert_eq!(h.spawner.pending(), 0);
        let texts = h.transport.texts().await;
        assert_eq!(texts.len(), 2);
        let reply = &texts[1];
        assert_eq!(reply.matches("ID: ").count(), 5);
        assert_eq!(reply.matches("Author: ").count(), 5);
        assert!(reply.ends_with("Use /jm [ID] to download."));
    }

    #[tokio::test]
    async fn test_search_failure_is_reported() {
        let h = harness();
        h.library.set_search(SearchOutcome {
            ok: false,
            msg: "rate limited".to_string(),
            album_list: vec![],
        });

        h.dispatcher
            .handle(RequestContext::direct(1), "/jmsearch abc")
            .await;

        let texts = h.transport.texts().await;
        assert_eq!(texts.last().unwrap(), "Search failed: rate limited");
    }

    #[tokio::test]
    async fn test_search_library_error_is_reported() {
        let h = harness();
        h.library.set_search_error("boom");

        let result = h
            .dispatcher
            .handle(RequestContext::group(3, 1), "/jm_search abc")
            .await;

        assert_eq!(result, Dispatch::Searched);
        let texts = h.transport.texts().await;
        assert_eq!(
            texts.last().unwrap(),
            "[CQ:at,qq=1] Search failed: failed to decode library helper output: boom"
        );
    }

    #[tokio::test]
    async fn test_search_with_no_results() {
        let h = harness();
        h.library.set_search(SearchOutcome {
            ok: true,
            msg: String::new(),
            album_list: vec![],
        });

        h.dispatcher
            .handle(RequestContext::direct(1), "/jm_search zzz")
            .await;

        let texts = h.transport.texts().await;
        assert_eq!(texts.last().unwrap(), "No results found for 'zzz'.");
    }

    #[tokio::test]
    async fn test_status_logged_out() {
        let h = harness();
        h.library.set_login(LoginStatus {
            is_login: false,
            msg: "session expired".to_string(),
            ..LoginStatus::default()
        });

        let result = h
            .dispatcher
            .handle(RequestContext::direct(1), "/jm_status")
            .await;

        assert_eq!(result, Dispatch::StatusReported);
        let texts = h.transport.texts().await;
        let reply = texts.last().unwrap();
        assert!(reply.contains("session expired"));
        assert!(!reply.contains("User:"));
        assert!(!reply.contains("Email:"));
        assert!(!reply.contains("VIP:"));
    }

    #[tokio::test]
    async fn test_status_logged_in_in_group() {
        let h = harness();
        h.library.set_login(logged_in("reader"));

        h.dispatcher
            .handle(RequestContext::group(3, 1), "/jminfo")
            .await;

        let texts = h.transport.texts().await;
        let reply = texts.last().unwrap();
        assert!(reply.starts_with("[CQ:at,qq=1] Logged in!"));
        assert!(reply.contains("User: reader"));
    }

    #[tokio::test]
    async fn test_status_library_error_is_reported() {
        let h = harness();
        h.library.set_login_error("boom");

        let result = h
            .dispatcher
            .handle(RequestContext::direct(1), "/jm_status")
            .await;

        assert_eq!(result, Dispatch::StatusReported);
        let texts = h.transport.texts().await;
        assert_eq!(
            texts.last().unwrap(),
            "Error while checking login status: failed to decode library helper output: boom"
        );
    }
}
