//! Cancellable background task handle

use std::future::Future;
use tokio::task::JoinHandle;

/// A spawned task that is aborted when cancelled or dropped
#[derive(Debug)]
pub struct ScheduledTask {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Spawn `future` on the current runtime
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(future)),
        }
    }

    /// Abort the task. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether the task is still scheduled and running
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
