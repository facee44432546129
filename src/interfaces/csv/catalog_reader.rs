use crate::domain::product::{Price, Product, Rating, decimal_from_text};
use crate::error::{FilterError, Result};
use csv::StringRecord;
use rust_decimal::Decimal;
use serde_json::Value;
use std::io::Read;

/// Reads a product catalog from a CSV source.
///
/// Expects a header row. The `id`, `name`, `category`, `price` and `rating`
/// columns feed the engine; any other column is carried along as a string
/// attribute. Prices and ratings that are blank or not numbers read as zero.
/// Rows whose field count differs from the header are reported as errors.
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads products in catalog order.
    pub fn products(mut self) -> Result<impl Iterator<Item = Result<Product>>> {
        let headers = self.reader.headers()?.clone();
        Ok(self.reader.into_records().map(move |record| {
            record
                .map(|record| product_from_record(&headers, &record))
                .map_err(FilterError::from)
        }))
    }
}

fn product_from_record(headers: &StringRecord, record: &StringRecord) -> Product {
    let mut product = Product::new(Value::Null, "", "", Decimal::ZERO, Decimal::ZERO);

    for (header, field) in headers.iter().zip(record.iter()) {
        match header {
            "id" => product.id = parse_id(field),
            "name" => product.name = field.to_string(),
            "category" => product.category = field.to_string(),
            "price" => product.price = Price::new(decimal_from_text(field).unwrap_or_default()),
            "rating" => product.rating = Rating::new(decimal_from_text(field).unwrap_or_default()),
            other => {
                product
                    .attributes
                    .insert(other.to_string(), Value::String(field.to_string()));
            }
        }
    }

    product
}

/// Integer ids stay numeric so CSV and JSON catalogs agree; anything else is kept as text.
fn parse_id(field: &str) -> Value {
    match field.parse::<i64>() {
        Ok(id) => Value::from(id),
        Err(_) if field.is_empty() => Value::Null,
        Err(_) => Value::String(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_reader_valid_stream() {
        let data = "id, name, category, price, rating\n1, Red Shoe, Footwear, 50, 4\n2, Blue Shoe, Footwear, 29.99, 4.5";
        let reader = CatalogReader::new(data.as_bytes());
        let results: Vec<Result<Product>> = reader.products().unwrap().collect();

        assert_eq!(results.len(), 2);
        let second = results[1].as_ref().unwrap();
        assert_eq!(second.id, json!(2));
        assert_eq!(second.name, "Blue Shoe");
        assert_eq!(second.price, Price::new(dec!(29.99)));
        assert_eq!(second.rating, Rating::new(dec!(4.5)));
    }

    #[test]
    fn test_reader_keeps_extra_columns() {
        let data = "id,name,category,price,rating,image\nsku-9,Red Hat,Apparel,20,3,hat.png";
        let products: Vec<Product> = CatalogReader::new(data.as_bytes())
            .products()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(products[0].id, json!("sku-9"));
        assert_eq!(products[0].attributes.get("image"), Some(&json!("hat.png")));
    }

    #[test]
    fn test_reader_coerces_bad_numbers() {
        let data = "id,name,category,price,rating\n1,Mystery,Misc,free,\n";
        let products: Vec<Product> = CatalogReader::new(data.as_bytes())
            .products()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(products[0].price, Price::ZERO);
        assert_eq!(products[0].rating, Rating::ZERO);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "id,name,category,price,rating\n1,Red Shoe,Footwear\n2,Blue Shoe,Footwear,30,5";
        let results: Vec<Result<Product>> = CatalogReader::new(data.as_bytes())
            .products()
            .unwrap()
            .collect();

        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }
}
