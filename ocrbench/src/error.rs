use thiserror::Error;

use crate::auth::AuthError;

/// Failure of a single OCR engine call.
///
/// These never escape an adapter's `run`; they end up as the `reason` of a
/// failed engine result.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Binary or service missing, unreachable, or rejecting our credentials.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The image or the engine's response could not be decoded.
    #[error("decode failure: {0}")]
    DecodeFailure(String),

    /// The engine ran and reported an error of its own.
    #[error("engine error: {0}")]
    Engine(String),

    #[error("timed out after {0} seconds")]
    Timeout(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while writing comparison results to disk.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no results to export, run the comparison first")]
    NoResults,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-level error for the library surface outside the engines: request
/// validation, authentication and logging setup.
#[derive(Error, Debug)]
pub enum OcrBenchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OcrBenchError>;
