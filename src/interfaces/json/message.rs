use crate::domain::criteria::{Criteria, PriceRange, SortOption};
use crate::domain::ports::CatalogFilter;
use crate::domain::product::{Price, Product, decimal_from_number, decimal_from_text};
use crate::domain::request::{FilterRequest, FilterResponse};
use crate::error::{FilterError, Result};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One bound of the `priceRange` pair.
///
/// Must be a number or a numeric string. Bounds are read the same way as product
/// prices, so numbers beyond what `Decimal` can hold saturate to `Decimal::MIN` /
/// `Decimal::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBound(pub Decimal);

impl Serialize for RangeBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Price::new(self.0).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RangeBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => Ok(Self(decimal_from_number(&number))),
            Value::String(text) => decimal_from_text(&text)
                .map(Self)
                .ok_or_else(|| de::Error::custom(format!("price bound {text:?} is not a number"))),
            other => Err(de::Error::custom(format!(
                "price bound must be a number, found {other}"
            ))),
        }
    }
}

/// The inbound message: a catalog snapshot plus every criterion.
///
/// All fields are required on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMessage {
    pub products: Vec<Product>,
    pub price_range: (RangeBound, RangeBound),
    pub selected_categories: Vec<String>,
    pub sort_option: String,
    pub search_query: String,
}

impl From<RequestMessage> for FilterRequest {
    fn from(message: RequestMessage) -> Self {
        let (min, max) = message.price_range;
        let criteria = Criteria::new(
            PriceRange::new(min.0, max.0),
            message.selected_categories,
            SortOption::parse(&message.sort_option),
            message.search_query,
        );
        FilterRequest::new(message.products, criteria)
    }
}

impl From<FilterRequest> for RequestMessage {
    fn from(request: FilterRequest) -> Self {
        let criteria = request.criteria;
        let mut categories: Vec<String> = criteria.categories.iter().cloned().collect();
        categories.sort();
        Self {
            products: request.products,
            price_range: (
                RangeBound(criteria.price_range.min),
                RangeBound(criteria.price_range.max),
            ),
            selected_categories: categories,
            sort_option: criteria.sort.as_str().to_string(),
            search_query: criteria.search_query().to_string(),
        }
    }
}

/// The outbound message: either `{"products": [...]}` or `{"error": "..."}`.
///
/// An empty result and a failed request are always distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseMessage {
    Products(Vec<Product>),
    Error(String),
}

impl From<Result<FilterResponse>> for ResponseMessage {
    fn from(result: Result<FilterResponse>) -> Self {
        match result {
            Ok(response) => Self::Products(response.products),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

impl ResponseMessage {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Decodes an inbound message, failing fast on malformed criteria.
pub fn decode_request(bytes: &[u8]) -> Result<FilterRequest> {
    let message: RequestMessage = serde_json::from_slice(bytes)
        .map_err(|e| FilterError::MalformedRequest(e.to_string()))?;
    Ok(message.into())
}

pub fn encode_response(message: &ResponseMessage) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// Decodes `bytes`, runs the request through `filter` and always produces
/// exactly one response message.
pub async fn serve_message<F>(filter: &F, bytes: &[u8]) -> ResponseMessage
where
    F: CatalogFilter + ?Sized,
{
    let result = match decode_request(bytes) {
        Ok(request) => filter.filter(request).await,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting filter request");
            Err(e)
        }
    };
    result.into()
}
