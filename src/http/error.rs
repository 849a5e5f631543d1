//! Error types for HTTP client operations.

use thiserror::Error;

/// Errors that can occur while talking to the accounting API.
///
/// Transport-level failures and decode failures are separate variants so a
/// dead connection can be told apart from a schema mismatch when reading
/// logs; the aggregation layer treats both the same way.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request did not complete (connection refused, timeout, DNS
    /// resolution, TLS handshake).
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("server error {status}: {body}")]
    ServerError {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not parse as the expected envelope shape.
    #[error("response decode error: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// Joining the base URL with a request path produced an invalid URL.
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
}
