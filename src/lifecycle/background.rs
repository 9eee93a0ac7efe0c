//! Registry for work that outlives the response that scheduled it.
//!
//! Handlers hand detached tasks (cache stores) to [`BackgroundTasks::spawn`]
//! and return immediately. The server calls [`BackgroundTasks::drain`] after
//! it stops accepting requests so no scheduled work is lost at shutdown.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinSet;

#[derive(Clone, Default)]
pub struct BackgroundTasks {
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set stays usable after a panic under the lock.
    fn registry(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule a detached task. Never waits for it.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.registry();
        // Reap finished tasks so the set does not grow without bound.
        while let Some(result) = tasks.try_join_next() {
            log_join_result(result);
        }
        tasks.spawn(task);
    }

    /// Number of tasks not yet reaped.
    pub fn pending(&self) -> usize {
        self.registry().len()
    }

    /// Wait until every scheduled task, including ones scheduled while
    /// draining, has finished.
    pub async fn drain(&self) {
        loop {
            let mut batch = {
                let mut tasks = self.registry();
                std::mem::take(&mut *tasks)
            };
            if batch.is_empty() {
                return;
            }
            tracing::debug!(tasks = batch.len(), "Draining background tasks");
            while let Some(result) = batch.join_next().await {
                log_join_result(result);
            }
        }
    }
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Background task failed");
    }
}
