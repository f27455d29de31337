//! Fire-and-forget task spawning.

use futures::future::BoxFuture;

/// Starts detached tasks. Nothing about a spawned task is retained: no
/// handle, no result, no registry.
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// Spawns onto the ambient tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        // Dropping the JoinHandle detaches the task; a panic stays inside it.
        drop(tokio::spawn(task));
    }
}
