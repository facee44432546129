use crate::domain::product::Product;
use crate::error::Result;
use crate::interfaces::json::message::{ResponseMessage, encode_response};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeSet;
use std::io::Write;

const BASE_COLUMNS: [&str; 5] = ["id", "name", "category", "price", "rating"];

/// Writes filter results to any `Write` sink, as CSV or as a JSON response message.
pub struct ProductWriter<W: Write> {
    writer: W,
}

impl<W: Write> ProductWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes products as CSV in the order given.
    ///
    /// Pass-through attributes become extra columns after the base ones, sorted
    /// by name; products lacking an attribute get an empty cell.
    pub fn write_csv(&mut self, products: &[Product]) -> Result<()> {
        let extra: BTreeSet<&str> = products
            .iter()
            .flat_map(|product| product.attributes.keys().map(String::as_str))
            .filter(|key| !BASE_COLUMNS.contains(key))
            .collect();

        let mut csv = csv::Writer::from_writer(&mut self.writer);

        let header: Vec<&str> = BASE_COLUMNS.iter().copied().chain(extra.iter().copied()).collect();
        csv.write_record(&header)?;

        for product in products {
            let mut row = vec![
                cell(&product.id),
                product.name.clone(),
                product.category.clone(),
                amount_cell(product.price.source(), product.price.value()),
                amount_cell(product.rating.source(), product.rating.value()),
            ];
            row.extend(
                extra
                    .iter()
                    .map(|key| product.attributes.get(*key).map(cell).unwrap_or_default()),
            );
            csv.write_record(&row)?;
        }

        csv.flush()?;
        Ok(())
    }

    /// Writes a single JSON response message followed by a newline.
    pub fn write_json(&mut self, message: &ResponseMessage) -> Result<()> {
        let encoded = encode_response(message)?;
        writeln!(self.writer, "{encoded}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Prices and ratings decoded from JSON keep their original text.
fn amount_cell(source: Option<&Value>, value: Decimal) -> String {
    source
        .map(cell)
        .unwrap_or_else(|| value.normalize().to_string())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
