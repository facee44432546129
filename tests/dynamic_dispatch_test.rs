use catalog_filter::domain::criteria::{Criteria, PriceRange, SortOption};
use catalog_filter::domain::ports::CatalogFilterBox;
use catalog_filter::domain::request::FilterRequest;
use catalog_filter::infrastructure::inline::InlineFilter;
use catalog_filter::infrastructure::worker::WorkerFilter;

mod common;

#[tokio::test]
async fn test_filters_as_trait_objects() {
    let inline: CatalogFilterBox = Box::new(InlineFilter::new());
    let worker: CatalogFilterBox = Box::new(WorkerFilter::spawn().unwrap());

    let criteria = Criteria::new(
        PriceRange::unbounded(),
        Vec::<String>::new(),
        SortOption::RatingDesc,
        "",
    );
    let inline_request = FilterRequest::new(common::sample_catalog(), criteria.clone());
    let worker_request = FilterRequest::new(common::sample_catalog(), criteria);

    // Verify Send + Sync by spawning tasks
    let inline_handle = tokio::spawn(async move { inline.filter(inline_request).await.unwrap() });
    let worker_handle = tokio::spawn(async move { worker.filter(worker_request).await.unwrap() });

    let inline_response = inline_handle.await.unwrap();
    let worker_response = worker_handle.await.unwrap();

    assert_eq!(common::ids(&inline_response.products), vec![2, 1, 3]);
    assert_eq!(inline_response.products, worker_response.products);
}
