use catalog_filter::domain::criteria::{Criteria, PriceRange, SortOption};
use catalog_filter::domain::product::Product;
use catalog_filter::domain::request::FilterRequest;
use catalog_filter::error::FilterError;
use catalog_filter::infrastructure::worker::WorkerFilter;
use catalog_filter::interfaces::csv::catalog_reader::CatalogReader;
use catalog_filter::interfaces::csv::product_writer::ProductWriter;
use catalog_filter::interfaces::json::message::{ResponseMessage, serve_message};
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Product catalog CSV file (id,name,category,price,rating)
    #[arg(required_unless_present = "request")]
    catalog: Option<PathBuf>,

    /// Serve a JSON request message instead of a CSV catalog. Use "-" for stdin.
    #[arg(long, conflicts_with = "catalog")]
    request: Option<PathBuf>,

    /// Lowest price to keep (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    min_price: Option<Decimal>,

    /// Highest price to keep (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    max_price: Option<Decimal>,

    /// Category to keep; repeat for several. Keeps every category when omitted.
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Case-insensitive substring to look for in product names
    #[arg(long, default_value = "")]
    search: String,

    /// One of price-asc, price-desc, rating-desc, newest
    #[arg(long, default_value = "newest")]
    sort: String,

    /// Output format for CSV catalogs
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();

    let cli = Cli::parse();
    let filter = WorkerFilter::spawn().into_diagnostic()?;

    let outcome = match cli.request.clone() {
        Some(path) => serve_request_file(&filter, path).await,
        None => filter_catalog(&filter, cli).await,
    };

    filter.shutdown().await.into_diagnostic()?;
    outcome
}

async fn serve_request_file(filter: &WorkerFilter, path: PathBuf) -> Result<()> {
    let mut bytes = Vec::new();
    if path.as_os_str() == "-" {
        io::stdin().read_to_end(&mut bytes).into_diagnostic()?;
    } else {
        File::open(&path)
            .into_diagnostic()?
            .read_to_end(&mut bytes)
            .into_diagnostic()?;
    }

    let response = serve_message(filter, &bytes).await;

    let stdout = io::stdout();
    ProductWriter::new(stdout.lock())
        .write_json(&response)
        .into_diagnostic()?;

    match response {
        ResponseMessage::Error(e) => Err(miette!("filtering failed: {e}")),
        ResponseMessage::Products(_) => Ok(()),
    }
}

/// The file line a catalog read error points at, when the CSV reader knows it.
fn catalog_line(error: &FilterError) -> Option<u64> {
    match error {
        FilterError::CsvError(e) => e.position().map(|position| position.line()),
        _ => None,
    }
}

async fn filter_catalog(filter: &WorkerFilter, cli: Cli) -> Result<()> {
    let Some(catalog_path) = cli.catalog else {
        return Err(miette!("no catalog given"));
    };

    let file = File::open(&catalog_path).into_diagnostic()?;
    let reader = CatalogReader::new(file);
    let mut products: Vec<Product> = Vec::new();
    for (row, product) in reader.products().into_diagnostic()?.enumerate() {
        match product {
            Ok(product) => products.push(product),
            Err(e) => {
                // Data rows start on line 2, after the header.
                let line = catalog_line(&e).unwrap_or(row as u64 + 2);
                tracing::warn!(line, error = %e, "skipping unreadable catalog row");
            }
        }
    }
    tracing::info!(path = %catalog_path.display(), products = products.len(), "catalog loaded");

    let price_range = PriceRange::new(
        cli.min_price.unwrap_or(Decimal::MIN),
        cli.max_price.unwrap_or(Decimal::MAX),
    );
    let criteria = Criteria::new(
        price_range,
        cli.categories,
        SortOption::parse(&cli.sort),
        cli.search,
    );

    let response = filter
        .worker()
        .filter(FilterRequest::new(products, criteria))
        .await
        .into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = ProductWriter::new(stdout.lock());
    let written = match cli.format {
        OutputFormat::Csv => writer.write_csv(&response.products),
        OutputFormat::Json => writer.write_json(&ResponseMessage::Products(response.products)),
    };
    written.into_diagnostic()
}
