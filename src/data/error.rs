//! Error type for loading and storing places.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaceError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server responded with status {status}")]
    Status { status: u16 },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No remote endpoint configured")]
    NotConfigured,

    /// A failure that carries no further detail
    #[error("Unspecified failure")]
    Unspecified,
}

impl PlaceError {
    /// Human-readable description suitable for an alert, if the error has one
    pub fn description(&self) -> Option<String> {
        match self {
            PlaceError::Unspecified => None,
            other => Some(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlaceError>;
