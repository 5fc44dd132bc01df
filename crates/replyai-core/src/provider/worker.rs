//! Runs a backend call on its own tokio task.
//!
//! SDK-style clients are driven through [`run_on_worker`] so the hand-off
//! is visible at the call site and a slow backend cannot hold up the task
//! serving the request. The spawned task is aborted when the deadline
//! passes or when the returned future is dropped.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

/// Errors from a worker-hosted call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkerError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("worker task failed: {0}")]
    Join(String),
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Spawn `call` onto a worker task and wait at most `timeout` for it.
pub async fn run_on_worker<F, T>(timeout: Duration, call: F) -> Result<T, WorkerError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut handle = AbortOnDrop(tokio::spawn(call));

    match tokio::time::timeout(timeout, &mut handle.0).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join_err)) => Err(WorkerError::Join(join_err.to_string())),
        Err(_) => {
            warn!(?timeout, "worker call exceeded deadline, aborting");
            Err(WorkerError::Timeout(timeout))
        }
    }
}
