//! Task spawner that holds tasks until the test releases them.

use futures::future::BoxFuture;
use std::sync::Mutex;

use crate::dispatcher::TaskSpawner;

/// Collects spawned tasks instead of starting them.
///
/// Lets a test observe what the dispatcher did before any task ran, then
/// drive every task to completion with [`run_all`](Self::run_all).
#[derive(Default)]
pub struct RecordingSpawner {
    tasks: Mutex<Vec<BoxFuture<'static, ()>>>,
}

impl std::fmt::Debug for RecordingSpawner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSpawner")
            .field("pending", &self.pending())
            .finish()
    }
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks spawned but not yet run.
    pub fn pending(&self) -> usize {
        self.tasks.lock().map(|t| t.len()).unwrap_or(0)
    }

    /// Start every pending task on the runtime and wait for all of them.
    ///
    /// Returns how many tasks panicked. A panic stays inside its task.
    pub async fn run_all(&self) -> usize {
        let tasks: Vec<_> = match self.tasks.lock() {
            Ok(mut tasks) => tasks.drain(..).collect(),
            Err(_) => return 0,
        };
        let handles: Vec<_> = tasks.into_iter().map(tokio::spawn).collect();

        let mut panicked = 0;
        for handle in handles {
            if handle.await.is_err() {
                panicked += 1;
            }
        }
        panicked
    }
}

impl TaskSpawner for RecordingSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(task);
        }
    }
}
