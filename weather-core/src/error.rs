use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure reading or writing one of the pipeline's files.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to serialize parsed data for {}: {source}", path.display())]
    Serialize { path: PathBuf, source: serde_json::Error },
}

/// Failure turning a response body into a JSON tree.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure building or submitting the cold-weather alert mail.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Invalid mail address '{address}': {source}")]
    Address {
        address: String,
        source: lettre::address::AddressError,
    },

    #[error("Failed to build alert message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP submission failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}
