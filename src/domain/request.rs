use super::criteria::Criteria;
use super::product::Product;
use std::fmt;

/// Identifies one dispatched request so its reply can be told apart from
/// replies to older requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One filtering request: an owned snapshot of the catalog plus the criteria.
///
/// The catalog is moved into the request, so the worker never aliases the
/// caller's live product list.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    pub id: RequestId,
    pub products: Vec<Product>,
    pub criteria: Criteria,
}

impl FilterRequest {
    pub fn new(products: Vec<Product>, criteria: Criteria) -> Self {
        Self {
            id: RequestId::default(),
            products,
            criteria,
        }
    }
}

/// The single reply to a [`FilterRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResponse {
    pub id: RequestId,
    pub products: Vec<Product>,
}
