#![allow(dead_code)]

use catalog_filter::domain::product::Product;
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Error;
use std::path::Path;

pub const CATEGORIES: [&str; 5] = ["Footwear", "Apparel", "Kitchen", "Garden", "Toys"];
const WORDS: [&str; 8] = ["Red", "Blue", "Shoe", "Hat", "Pan", "Rake", "Robot", "Scarf"];

/// The three-product catalog used throughout the scenario tests.
pub fn sample_catalog() -> Vec<Product> {
    vec![
        Product::new(1, "Red Shoe", "Footwear", dec!(50), dec!(4)),
        Product::new(2, "Blue Shoe", "Footwear", dec!(30), dec!(5)),
        Product::new(3, "Red Hat", "Apparel", dec!(20), dec!(3)),
    ]
}

/// Products with few distinct prices and ratings, so sorts hit plenty of ties.
pub fn random_catalog<R: Rng>(rng: &mut R, size: usize) -> Vec<Product> {
    (1..=size)
        .map(|id| {
            let name = format!(
                "{} {}",
                WORDS.choose(rng).unwrap_or(&"Plain"),
                WORDS.choose(rng).unwrap_or(&"Thing")
            );
            let category = CATEGORIES.choose(rng).unwrap_or(&"Toys");
            let price = Decimal::from(rng.gen_range(0..20) * 5);
            let rating = Decimal::new(rng.gen_range(0..=10) * 5, 1);
            Product::new(id as i64, name, *category, price, rating)
        })
        .collect()
}

pub fn generate_catalog_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let mut rng = rand::thread_rng();
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;

    wtr.write_record(["id", "name", "category", "price", "rating"])?;
    for product in random_catalog(&mut rng, rows) {
        wtr.write_record([
            product.id.to_string(),
            product.name,
            product.category,
            product.price.value().to_string(),
            product.rating.value().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn ids(products: &[Product]) -> Vec<i64> {
    products
        .iter()
        .filter_map(|product| product.id.as_i64())
        .collect()
}
