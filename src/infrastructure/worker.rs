use crate::application::worker::FilterWorker;
use crate::domain::ports::CatalogFilter;
use crate::domain::request::{FilterRequest, FilterResponse};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A [`CatalogFilter`] backed by a dedicated [`FilterWorker`] thread.
///
/// `Clone` shares the underlying worker.
#[derive(Clone)]
pub struct WorkerFilter {
    worker: Arc<FilterWorker>,
}

impl WorkerFilter {
    pub fn new(worker: FilterWorker) -> Self {
        Self {
            worker: Arc::new(worker),
        }
    }

    pub fn spawn() -> Result<Self> {
        Ok(Self::new(FilterWorker::spawn()?))
    }

    pub fn worker(&self) -> &FilterWorker {
        &self.worker
    }

    /// Shuts the worker down once this is the last handle to it; otherwise
    /// just releases this handle.
    pub async fn shutdown(self) -> Result<()> {
        match Arc::try_unwrap(self.worker) {
            Ok(worker) => worker.shutdown().await,
            Err(_) => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogFilter for WorkerFilter {
    async fn filter(&self, request: FilterRequest) -> Result<FilterResponse> {
        self.worker.filter(request).await
    }
}
