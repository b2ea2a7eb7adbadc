//! Error types for the HTTP transport.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy. This
/// crate never retries; every transport failure surfaces to the caller.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// Covers DNS resolution failures, connection refused and other
    /// transport-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    ///
    /// A configuration problem rather than a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
