//! Error types for the DNS control client.

use thiserror::Error;

/// Error type for DirectAdmin control operations.
#[derive(Debug, Error)]
pub enum DnsError {
    /// The control endpoint could not be reached.
    #[error("Failed to reach DNS control endpoint: {0}")]
    Http(#[from] crate::transport::HttpError),

    /// The control endpoint answered with a non-success status.
    ///
    /// DirectAdmin reports authentication and validation failures this
    /// way; treating them as success would let a misconfigured run
    /// pass silently.
    #[error("DNS control endpoint rejected '{operation}' request: HTTP {status}")]
    Api {
        /// The operation that was attempted (list/add/delete).
        operation: &'static str,
        /// The status code the endpoint answered with.
        status: http::StatusCode,
    },

    /// The configured host/port/domain do not form a valid endpoint URL.
    #[error("Invalid DNS control endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}
