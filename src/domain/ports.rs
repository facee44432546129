use super::request::{FilterRequest, FilterResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Something that can run a filtering request to completion.
#[async_trait]
pub trait CatalogFilter: Send + Sync {
    async fn filter(&self, request: FilterRequest) -> Result<FilterResponse>;
}

pub type CatalogFilterBox = Box<dyn CatalogFilter>;
