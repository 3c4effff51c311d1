// src/health/error.rs
use std::time::Duration;

/// The HTTP exchange could not be completed. Distinct from a response with an
/// unexpected status, which is a failed check rather than an error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl TransportError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Connect { .. } => "connect",
            TransportError::Timeout { .. } => "timeout",
            TransportError::Request { .. } => "request",
        }
    }

    pub(crate) fn from_reqwest(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            TransportError::Timeout { url, timeout }
        } else if err.is_connect() {
            // DNS failures surface as connect errors in reqwest
            TransportError::Connect { url, message: err.to_string() }
        } else {
            TransportError::Request { url, message: err.to_string() }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("Invalid target URL {0:?}: {1}")]
    Parse(String, url::ParseError),

    #[error("Unsupported scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
}
