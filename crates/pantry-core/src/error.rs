//! Error types for Pantry
//!
//! Only the host-facing edges (file ingestion, configuration) can fail.
//! The analytics pass itself never returns an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),
}

pub type Result<T> = std::result::Result<T, Error>;
