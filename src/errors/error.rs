//! Error types for the Perplexity API client.

use thiserror::Error;

/// Result type alias for Perplexity operations
pub type PerplexityResult<T> = Result<T, PerplexityError>;

/// Main error type for the Perplexity API client.
///
/// The variants keep "the server answered badly" (`RequestFailed`) distinct
/// from "we gave up" (`Cancelled`/`Timeout`) so callers can react differently.
#[derive(Error, Debug, Clone)]
pub enum PerplexityError {
    /// Configuration error (invalid settings, missing required fields)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Authentication error (invalid or missing credentials)
    #[error("Authentication error: {message}")]
    Authentication {
        /// Error message describing the authentication issue
        message: String,
    },

    /// Invalid argument supplied by the caller, rejected before any network call
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Non-2xx HTTP status from the service
    #[error("Request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Truncated body excerpt
        message: String,
    },

    /// Network error (connection failed, DNS issues)
    #[error("Network error: {message}")]
    Network {
        /// Error message describing the network issue
        message: String,
    },

    /// The exchange exceeded the caller-specified deadline
    #[error("Request timed out")]
    Timeout,

    /// The transport was closed or aborted before the exchange completed
    #[error("Request cancelled: {message}")]
    Cancelled {
        /// What was observed when the connection went away
        message: String,
    },

    /// Streaming error (SSE framing failures, stream interruption)
    #[error("Stream error: {message}")]
    Stream {
        /// Error message describing the stream issue
        message: String,
    },

    /// Internal error (unexpected conditions, library bugs)
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal issue
        message: String,
    },
}

impl PerplexityError {
    /// Returns true if the exchange was interrupted rather than answered.
    ///
    /// Interruptions are `Cancelled` and `Timeout`; everything else means the
    /// request ran to completion (successfully or not).
    pub fn is_interruption(&self) -> bool {
        matches!(
            self,
            PerplexityError::Cancelled { .. } | PerplexityError::Timeout
        )
    }

    /// Returns the HTTP status code for `RequestFailed` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            PerplexityError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversions from common error types
impl From<reqwest::Error> for PerplexityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PerplexityError::Timeout
        } else if err.is_connect() {
            PerplexityError::Network {
                message: format!("Connection failed: {}", err),
            }
        } else if err.is_body() || err.is_decode() {
            PerplexityError::Cancelled {
                message: format!("Response body interrupted: {}", err),
            }
        } else {
            PerplexityError::Network {
                message: format!("Network error: {}", err),
            }
        }
    }
}

impl From<serde_json::Error> for PerplexityError {
    fn from(err: serde_json::Error) -> Self {
        PerplexityError::Internal {
            message: format!("JSON serialization/deserialization error: {}", err),
        }
    }
}

impl From<url::ParseError> for PerplexityError {
    fn from(err: url::ParseError) -> Self {
        PerplexityError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interruption_classification() {
        let cancelled = PerplexityError::Cancelled {
            message: "connection reset".to_string(),
        };
        assert!(cancelled.is_interruption());
        assert!(PerplexityError::Timeout.is_interruption());

        let failed = PerplexityError::RequestFailed {
            status: 500,
            message: "internal".to_string(),
        };
        assert!(!failed.is_interruption());
    }

    #[test]
    fn test_status_accessor() {
        let failed = PerplexityError::RequestFailed {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert_eq!(failed.status(), Some(403));

        let network = PerplexityError::Network {
            message: "no route".to_string(),
        };
        assert_eq!(network.status(), None);
    }
}
