use crate::application::engine;
use crate::domain::ports::CatalogFilter;
use crate::domain::request::{FilterRequest, FilterResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Runs the engine directly on the calling task.
///
/// Useful in tests and for catalogs small enough that moving them to another
/// thread costs more than filtering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineFilter;

impl InlineFilter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogFilter for InlineFilter {
    async fn filter(&self, request: FilterRequest) -> Result<FilterResponse> {
        Ok(engine::process_request(request))
    }
}
