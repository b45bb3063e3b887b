//! Error handling module for GigaHz
//!
//! Provides centralized error types using thiserror. Catalog and session-store
//! failures have their own enums so callers can keep them scoped; everything
//! funnels into [`GigahzError`] at the application boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while fetching or decoding a product list
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The product API answered with a non-success status
    #[error("API error {status}")]
    Status { status: u16 },

    /// Network or protocol failure talking to the product API
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Malformed product JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Offline catalog file could not be read
    #[error("Failed to read catalog file {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the durable session store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Session store IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file or stored value is not valid JSON
    #[error("Session store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main error type for GigaHz
#[derive(Error, Debug)]
pub enum GigahzError {
    /// IO errors (terminal, files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Product catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Session store errors
    #[error("Session store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors
    #[error("{0}")]
    General(String),
}

/// Result type alias for GigaHz operations
pub type Result<T> = std::result::Result<T, GigahzError>;

impl GigahzError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}
