//! External IP resolution.
//!
//! Asks a public IP-echo service what address the caller's traffic
//! originates from. The echoed body is trimmed and validated as a strict
//! dotted-quad before anything else in the run gets to see it; a body
//! that does not look like an IPv4 address aborts the run instead of
//! being cached or pushed into DNS.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::transport::{HttpClient, HttpError, HttpRequest};


/// IP-echo service queried for the current public address.
pub const ECHO_URL: &str = "https://checkip.amazonaws.com/";

/// Strict dotted-quad matcher: four octets, each 0-255, nothing else.
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([01]?\d\d?|2[0-4]\d|25[0-5])\.){3}([01]?\d\d?|2[0-4]\d|25[0-5])$")
        .expect("IPv4 pattern is valid")
});

/// Returns true if `ip` is a well-formed dotted-quad IPv4 address.
#[must_use]
pub fn is_valid_ipv4(ip: &str) -> bool {
    IPV4_PATTERN.is_match(ip)
}

/// Error type for external IP resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The echo service could not be reached.
    #[error("Failed to reach IP echo service: {0}")]
    Http(#[from] HttpError),

    /// The echo service answered with something that is not an IPv4 address.
    #[error("IP echo service returned an invalid address: '{body}'")]
    InvalidIp {
        /// The trimmed response body that failed validation.
        body: String,
    },
}

/// Resolves the caller's current public IPv4 address.
///
/// Generic over [`HttpClient`] so tests can script the echo response.
#[derive(Debug, Clone)]
pub struct ExternalIpResolver<H> {
    client: H,
    url: url::Url,
}

impl<H> ExternalIpResolver<H> {
    /// Creates a resolver against the default echo service.
    #[must_use]
    pub fn new(client: H) -> Self {
        Self {
            client,
            url: url::Url::parse(ECHO_URL).expect("echo URL is valid"),
        }
    }

    /// Overrides the echo endpoint (used by tests).
    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.url = url;
        self
    }
}

impl<H: HttpClient> ExternalIpResolver<H> {
    /// Fetches and validates the current external IP.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Http`] on any transport failure (not
    /// retried) and [`ResolveError::InvalidIp`] when the trimmed body is
    /// not a dotted-quad IPv4 address.
    pub async fn current_ip(&self) -> Result<String, ResolveError> {
        let response = self.client.request(HttpRequest::get(self.url.clone())).await?;
        let body = String::from_utf8_lossy(&response.body);
        let candidate = body.trim();

        if is_valid_ipv4(candidate) {
            Ok(candidate.to_string())
        } else {
            Err(ResolveError::InvalidIp {
                body: candidate.to_string(),
            })
        }
    }
}
