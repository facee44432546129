use crate::domain::criteria::{Criteria, SortOption};
use crate::domain::product::Product;
use crate::domain::request::{FilterRequest, FilterResponse};
use std::borrow::Borrow;
use std::cmp::Reverse;
use std::convert;

/// Filters `catalog` by `criteria` and orders the matches by the requested sort.
///
/// The catalog is only read; matching products are cloned into the result.
/// Sorting is stable, so products with equal keys keep their catalog order,
/// and `SortOption::Newest` leaves the filtered subsequence untouched.
pub fn process(catalog: &[Product], criteria: &Criteria) -> Vec<Product> {
    filter_and_sort(catalog, criteria, Product::clone)
}

/// Runs a whole request and echoes its id on the response.
///
/// The request owns its snapshot, so matches are moved out instead of cloned.
pub fn process_request(request: FilterRequest) -> FilterResponse {
    let FilterRequest {
        id,
        products,
        criteria,
    } = request;

    FilterResponse {
        id,
        products: filter_and_sort(products, &criteria, convert::identity),
    }
}

/// Keeps the products `criteria` matches, converting only those to owned values,
/// then sorts them.
fn filter_and_sort<P: Borrow<Product>>(
    products: impl IntoIterator<Item = P>,
    criteria: &Criteria,
    into_owned: fn(P) -> Product,
) -> Vec<Product> {
    if criteria.price_range.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<Product> = products
        .into_iter()
        .filter(|product| criteria.matches(product.borrow()))
        .map(into_owned)
        .collect();

    sort_products(&mut matches, criteria.sort);
    matches
}

/// `sort_by_key` is a stable sort; ties keep their relative order.
fn sort_products(products: &mut [Product], sort: SortOption) {
    match sort {
        SortOption::PriceAsc => products.sort_by_key(|product| product.price.value()),
        SortOption::PriceDesc => products.sort_by_key(|product| Reverse(product.price.value())),
        SortOption::RatingDesc => products.sort_by_key(|product| Reverse(product.rating.value())),
        SortOption::Newest => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criteria::PriceRange;
    use crate::domain::request::RequestId;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Red Shoe", "Footwear", dec!(50), dec!(4)),
            Product::new(2, "Blue Shoe", "Footwear", dec!(30), dec!(5)),
            Product::new(3, "Red Hat", "Apparel", dec!(20), dec!(3)),
        ]
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products
            .iter()
            .map(|product| product.id.as_i64().unwrap())
            .collect()
    }

    fn criteria(categories: &[&str], sort: &str, search: &str) -> Criteria {
        Criteria::new(
            PriceRange::new(dec!(0), dec!(100)),
            categories.iter().copied(),
            SortOption::parse(sort),
            search,
        )
    }

    #[test]
    fn test_search_keeps_catalog_order() {
        let result = process(&catalog(), &criteria(&[], "newest", "shoe"));
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_price_asc() {
        let result = process(&catalog(), &criteria(&[], "price-asc", ""));
        assert_eq!(ids(&result), vec![3, 2, 1]);
    }

    #[test]
    fn test_price_desc() {
        let result = process(&catalog(), &criteria(&[], "price-desc", ""));
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_rating_desc() {
        let result = process(&catalog(), &criteria(&[], "rating-desc", ""));
        assert_eq!(ids(&result), vec![2, 1, 3]);
    }

    #[test]
    fn test_category_filter() {
        let result = process(&catalog(), &criteria(&["Apparel"], "newest", ""));
        assert_eq!(ids(&result), vec![3]);
    }

    #[test]
    fn test_padded_uppercase_search() {
        let result = process(&catalog(), &criteria(&[], "newest", "  RED  "));
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_catalog_order() {
        let result = process(&catalog(), &criteria(&[], "best-sellers", ""));
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_inverted_range_yields_nothing() {
        let criteria = Criteria::new(
            PriceRange::new(dec!(200), dec!(100)),
            Vec::<String>::new(),
            SortOption::Newest,
            "",
        );
        assert!(process(&catalog(), &criteria).is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(process(&[], &criteria(&["Apparel"], "price-asc", "hat")).is_empty());
    }

    #[test]
    fn test_equal_prices_keep_catalog_order() {
        let catalog = vec![
            Product::new(1, "A", "X", dec!(10), dec!(1)),
            Product::new(2, "B", "X", dec!(5), dec!(2)),
            Product::new(3, "C", "X", dec!(10), dec!(2)),
            Product::new(4, "D", "X", dec!(5), dec!(1)),
        ];

        let asc = process(&catalog, &criteria(&[], "price-asc", ""));
        assert_eq!(ids(&asc), vec![2, 4, 1, 3]);

        let desc = process(&catalog, &criteria(&[], "price-desc", ""));
        assert_eq!(ids(&desc), vec![1, 3, 2, 4]);

        let rating = process(&catalog, &criteria(&[], "rating-desc", ""));
        assert_eq!(ids(&rating), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_catalog_is_not_mutated() {
        let catalog = catalog();
        let before = catalog.clone();
        let _ = process(&catalog, &criteria(&[], "price-asc", ""));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_process_request_echoes_id_and_preserves_attributes() {
        let products = vec![
            Product::new(1, "Red Shoe", "Footwear", dec!(50), dec!(4))
                .with_attribute("image", "red.png"),
        ];
        let mut request = FilterRequest::new(products.clone(), Criteria::match_all());
        request.id = RequestId(9);

        let response = process_request(request);
        assert_eq!(response.id, RequestId(9));
        assert_eq!(response.products, products);
        assert_eq!(
            response.products[0].attributes.get("image"),
            Some(&json!("red.png"))
        );
    }
}
