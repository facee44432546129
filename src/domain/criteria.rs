use super::product::Product;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt;

/// Inclusive price bounds. A range whose `min` exceeds its `max` is valid and
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// The widest representable range; plays the role of `[-inf, +inf]`.
    pub fn unbounded() -> Self {
        Self::new(Decimal::MIN, Decimal::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    PriceAsc,
    PriceDesc,
    RatingDesc,
    /// Catalog order. Also the fallback for unrecognized option names.
    #[default]
    Newest,
}

impl SortOption {
    /// Parses an option name; anything unrecognized falls back to `Newest`.
    pub fn parse(name: &str) -> Self {
        match name {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "rating-desc" => Self::RatingDesc,
            _ => Self::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::RatingDesc => "rating-desc",
            Self::Newest => "newest",
        }
    }
}

impl From<&str> for SortOption {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for SortOption {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full set of filter and sort criteria for one request.
///
/// All fields are supplied together; there are no partial updates. An empty
/// category set and a blank search query each mean "no restriction".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    pub price_range: PriceRange,
    pub categories: HashSet<String>,
    pub sort: SortOption,
    search_query: String,
    needle: Option<String>,
}

impl Criteria {
    pub fn new(
        price_range: PriceRange,
        categories: impl IntoIterator<Item = impl Into<String>>,
        sort: SortOption,
        search_query: impl Into<String>,
    ) -> Self {
        let search_query = search_query.into();
        let needle = search_needle(&search_query);
        Self {
            price_range,
            categories: categories.into_iter().map(Into::into).collect(),
            sort,
            search_query,
            needle,
        }
    }

    /// Criteria that match every product and keep catalog order.
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn matches_search(&self, product: &Product) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => product.name.to_lowercase().contains(needle.as_str()),
        }
    }

    pub fn matches_category(&self, product: &Product) -> bool {
        self.categories.is_empty() || self.categories.contains(&product.category)
    }

    pub fn matches_price(&self, product: &Product) -> bool {
        self.price_range.contains(product.price.value())
    }

    /// All three predicates, cheapest first. The search check allocates a
    /// lower-cased copy of the name, so it runs last.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_category(product)
            && self.matches_price(product)
            && self.matches_search(product)
    }
}

/// Trimmed, lower-cased query; `None` when the query is blank.
fn search_needle(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
