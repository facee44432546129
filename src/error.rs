use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Malformed filter request: {0}")]
    MalformedRequest(String),
    #[error("Filter worker is not running")]
    WorkerUnavailable,
    #[error("Filter worker dropped request {0} without replying")]
    ResponseDropped(u64),
    #[error("Filter worker panicked while processing request {0}")]
    WorkerPanicked(u64),
}

pub type Result<T> = std::result::Result<T, FilterError>;
