// Error types for songsearch.
// Covers feed fetch failures, local store failures, and configuration errors.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Network response was not ok ({0})")]
    Status(StatusCode),

    #[error("Store transaction failed: {0}")]
    Persistence(String),

    #[error("Store schema version {found} is newer than supported version {supported}")]
    SchemaVersion { found: u32, supported: u32 },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error belongs to the feed side (transport or HTTP status).
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Status(_))
    }

    /// Whether this error came from a store transaction.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::Persistence(_) | Error::SchemaVersion { .. } | Error::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
