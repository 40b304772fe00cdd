use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the client core.
///
/// `FileRead` and `Parse` abort an import before anything is submitted.
/// `Api` and `Network` are per-call failures; during a sequential import
/// they are counted per row instead of propagated. `Validation` fires
/// before any network call is made.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to read file: {0}")]
    FileRead(#[source] std::io::Error),
    #[error("failed to parse spreadsheet: {0}")]
    Parse(String),
    #[error("failed to build workbook: {0}")]
    Workbook(String),
    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("validation failed: {0}")]
    Validation(String),
}
