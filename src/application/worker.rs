use super::engine;
use crate::domain::request::{FilterRequest, FilterResponse, RequestId};
use crate::error::{FilterError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};

pub const DEFAULT_THREAD_NAME: &str = "catalog-filter-worker";

/// Settings for the dedicated worker thread.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub thread_name: String,
    /// Stack size in bytes; the platform default when `None`.
    pub stack_size: Option<usize>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
        }
    }
}

struct Job {
    request: FilterRequest,
    reply: oneshot::Sender<Result<FilterResponse>>,
}

/// Runs the filter engine on its own OS thread.
///
/// Requests travel over a channel and each one gets exactly one reply over a
/// oneshot channel. The worker handles one request at a time, in the order they
/// were dispatched, so replies from a single worker come back in request order.
/// There is no cancellation: a dispatched request always runs to completion.
pub struct FilterWorker {
    sender: mpsc::UnboundedSender<Job>,
    /// Held across id assignment and enqueueing, so queue order is id order.
    next_id: Mutex<u64>,
    handle: Option<JoinHandle<()>>,
}

impl FilterWorker {
    /// Starts a worker with the default configuration.
    pub fn spawn() -> Result<Self> {
        Self::with_config(WorkerConfig::default())
    }

    pub fn with_config(config: WorkerConfig) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let handle = builder.spawn(move || run(receiver, engine::process_request))?;

        tracing::info!(thread = %config.thread_name, "filter worker started");
        Ok(Self {
            sender,
            next_id: Mutex::new(1),
            handle: Some(handle),
        })
    }

    /// Hands a request to the worker without waiting for the result.
    ///
    /// The request is stamped with a fresh [`RequestId`], replacing whatever id
    /// it carried. Callers on different threads may dispatch concurrently; a
    /// higher id is always queued, and therefore answered, after a lower one.
    /// Fails with [`FilterError::WorkerUnavailable`] if the worker thread has
    /// stopped.
    pub fn dispatch(&self, mut request: FilterRequest) -> Result<PendingResponse> {
        let mut next_id = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
        let id = RequestId(*next_id);
        request.id = id;

        tracing::debug!(
            request_id = %id,
            products = request.products.len(),
            sort = %request.criteria.sort,
            "dispatching filter request"
        );

        let (reply, receiver) = oneshot::channel();
        self.sender.send(Job { request, reply }).map_err(|_| {
            tracing::error!(request_id = %id, "filter worker is not running");
            FilterError::WorkerUnavailable
        })?;
        *next_id += 1;

        Ok(PendingResponse { id, receiver })
    }

    /// Dispatches a request and waits for its reply.
    pub async fn filter(&self, request: FilterRequest) -> Result<FilterResponse> {
        self.dispatch(request)?.wait().await
    }

    /// Stops accepting requests, lets queued ones finish and joins the thread.
    pub async fn shutdown(mut self) -> Result<()> {
        let handle = self.handle.take();
        drop(self);

        if let Some(handle) = handle {
            let joined = tokio::task::spawn_blocking(move || handle.join()).await;
            if !matches!(joined, Ok(Ok(()))) {
                tracing::error!("filter worker did not shut down cleanly");
                return Err(FilterError::WorkerUnavailable);
            }
        }

        tracing::info!("filter worker stopped");
        Ok(())
    }
}

/// Serves queued jobs with `process` until every sender is gone.
fn run<F>(mut receiver: mpsc::UnboundedReceiver<Job>, process: F)
where
    F: Fn(FilterRequest) -> FilterResponse,
{
    while let Some(Job { request, reply }) = receiver.blocking_recv() {
        let id = request.id;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| process(request))).map_err(|_| {
            tracing::error!(request_id = %id, "filter engine panicked");
            FilterError::WorkerPanicked(id.0)
        });

        if let Ok(response) = &outcome {
            tracing::debug!(
                request_id = %id,
                matched = response.products.len(),
                "filter request completed"
            );
        }

        if reply.send(outcome).is_err() {
            tracing::debug!(request_id = %id, "caller stopped waiting for filter response");
        }
    }
}

/// The caller's side of one in-flight request.
#[derive(Debug)]
pub struct PendingResponse {
    id: RequestId,
    receiver: oneshot::Receiver<Result<FilterResponse>>,
}

impl PendingResponse {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Waits for the single reply.
    ///
    /// A worker that goes away without replying yields
    /// [`FilterError::ResponseDropped`] rather than hanging.
    pub async fn wait(self) -> Result<FilterResponse> {
        let id = self.id;
        self.receiver
            .await
            .map_err(|_| FilterError::ResponseDropped(id.0))?
    }
}

/// Tracks the most recently issued request so that replies to superseded
/// requests can be discarded.
///
/// Can be shared between tasks; ids only move forward.
#[derive(Debug, Default)]
pub struct LatestResponse {
    latest: AtomicU64,
}

impl LatestResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pending` as the newest request, unless a newer one was already tracked.
    pub fn track(&self, pending: &PendingResponse) {
        self.latest.fetch_max(pending.id().0, Ordering::AcqRel);
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest.load(Ordering::Acquire) == id.0
    }

    /// Returns the response only if it answers the newest tracked request.
    pub fn accept(&self, response: FilterResponse) -> Option<FilterResponse> {
        if self.is_current(response.id) {
            Some(response)
        } else {
            tracing::debug!(request_id = %response.id, "discarding stale filter response");
            None
        }
    }
}
