//! Error types for tale-core.
//!
//! Public sync operations resolve to result envelopes rather than
//! errors; this enum covers construction and local-persistence failures
//! that happen before a call reaches the gateway.

use thiserror::Error;

/// Result type for tale-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tale-core.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The gateway base URL is not usable.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// The local store failed.
    #[error("Store error: {0}")]
    Store(#[from] tale_store::Error),
}
