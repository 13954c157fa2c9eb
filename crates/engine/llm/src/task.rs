//! Background workers for generation requests

use crate::error::{Error, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Unique identifier for a worker, used to tag log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(u64);

impl WorkerId {
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Owner side of a worker: cooperative stop and the final outcome
///
/// Dropping the handle neither stops the worker nor waits for it.
#[derive(Debug)]
pub struct WorkerHandle<T> {
    pub id: WorkerId,
    stop: Arc<AtomicBool>,
    outcome: Option<oneshot::Receiver<Result<T>>>,
}

impl<T> WorkerHandle<T> {
    /// Ask the worker to stop at its next checkpoint
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Wait for the worker body to return
    ///
    /// The outcome can be taken once; later calls return `Error::Channel`.
    pub async fn join(&mut self) -> Result<T> {
        match self.outcome.take() {
            Some(rx) => rx.await?,
            None => Err(Error::Channel(format!("{} already joined", self.id))),
        }
    }
}

/// Worker-side view of the cancellation flag
#[derive(Debug, Clone)]
pub struct WorkerContext {
    id: WorkerId,
    stop: Arc<AtomicBool>,
}

impl WorkerContext {
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// `Error::Cancelled` once the owner asked the worker to stop
    pub fn check_cancelled(&self) -> Result<()> {
        if self.stop.load(Ordering::Relaxed) {
            Err(Error::Cancelled(format!("{} cancelled", self.id)))
        } else {
            Ok(())
        }
    }
}

/// Run `f` as a tokio task and return a handle to its outcome
pub fn spawn_worker<T, F, Fut>(f: F) -> WorkerHandle<T>
where
    T: Send + 'static,
    F: FnOnce(WorkerContext) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let id = WorkerId::new();
    let stop = Arc::new(AtomicBool::new(false));
    let (outcome_tx, outcome_rx) = oneshot::channel();
    let ctx = WorkerContext {
        id,
        stop: stop.clone(),
    };

    tokio::spawn(async move {
        tracing::debug!("{} started", id);
        let outcome = f(ctx).await;
        match &outcome {
            Ok(_) => tracing::debug!("{} completed", id),
            Err(Error::Cancelled(_)) => tracing::debug!("{} cancelled", id),
            Err(e) => tracing::debug!("{} failed: {}", id, e),
        }
        let _ = outcome_tx.send(outcome);
    });

    WorkerHandle {
        id,
        stop,
        outcome: Some(outcome_rx),
    }
}
