use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the API access layer.
///
/// The layer performs no retries and no backoff; every failure propagates to
/// the immediate caller. A cache miss is not an error, and a rate-limiter
/// wait is delay, never failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-2xx status. The message is a best-effort
    /// extract of the response body and may be empty.
    #[error("Aha! API returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// The HTTP call itself failed (DNS, connection reset, transport
    /// timeout). Propagated unchanged.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response payload did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured domain does not produce a valid base URL.
    #[error("invalid API domain: {0}")]
    InvalidDomain(String),
}

impl ApiError {
    /// Builds the non-2xx variant, capping the message at `max_len` chars so
    /// an HTML error page does not balloon the error.
    pub fn from_status(status: StatusCode, body: String, max_len: usize) -> Self {
        let message: String = body.chars().take(max_len).collect();
        ApiError::Api { status, message }
    }

    /// Status code for `Api` errors, `None` for transport-level failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
