//! Error classification for the gateway
//!
//! One typed error surface for the protocol client, the streaming decoder
//! and the configuration layer. A failed turn always reaches the caller as
//! one of these variants, never as a silent partial success.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// VQD token acquisition failed (status endpoint unreachable, timed
    /// out, or did not return the token header)
    #[error("token acquisition failed: {reason}")]
    TokenAcquisition {
        /// Why the status endpoint did not yield a token
        reason: String,
    },

    /// Network-level failure while dispatching a chat turn
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the connection or timeout error
        message: String,
    },

    /// Non-retryable upstream rejection of a chat turn
    #[error("upstream error {status}: {body}")]
    Upstream {
        /// HTTP status returned by the chat endpoint
        status: StatusCode,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// The anti-bot refresh-and-retry loop exceeded its bound
    #[error("retries exhausted after anti-bot rejection: {last_body}")]
    RetryExhausted {
        /// Body of the last rejected response
        last_body: String,
    },

    /// Low-level read error on the event stream, distinct from a clean
    /// `[DONE]` termination
    #[error("stream read failed: {message}")]
    StreamRead {
        /// Description of the read failure
        message: String,
    },

    /// The event stream could not be decoded
    #[error("stream decode failed: {message}")]
    StreamDecode {
        /// Description of the decode failure
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// Validation errors
    #[error("Validation failed for {field}: {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Error message describing the validation failure
        message: String,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal issue
        message: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a token acquisition error
    pub fn token_acquisition(reason: impl Into<String>) -> Self {
        Self::TokenAcquisition {
            reason: reason.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an upstream rejection error
    pub fn upstream(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create a retry exhaustion error
    pub fn retry_exhausted(last_body: impl Into<String>) -> Self {
        Self::RetryExhausted {
            last_body: last_body.into(),
        }
    }

    /// Create a stream read error
    pub fn stream_read(message: impl Into<String>) -> Self {
        Self::StreamRead {
            message: message.into(),
        }
    }

    /// Create a stream decode error
    pub fn stream_decode(message: impl Into<String>) -> Self {
        Self::StreamDecode {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Error::Http(..) => "http",
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Url(..) => "url",
            Error::Io(..) => "io",
            Error::TokenAcquisition { .. } => "token_acquisition",
            Error::Transport { .. } => "transport",
            Error::Upstream { .. } => "upstream",
            Error::RetryExhausted { .. } => "retry_exhausted",
            Error::StreamRead { .. } => "stream_read",
            Error::StreamDecode { .. } => "stream_decode",
            Error::Config { .. } => "config",
            Error::Validation { .. } => "validation",
            Error::Internal { .. } => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("field", "test config error");
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(
            err.to_string(),
            "Configuration error in field: test config error"
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_token_acquisition_error() {
        let err = Error::token_acquisition("status endpoint returned no x-vqd-4 header");
        assert!(matches!(err, Error::TokenAcquisition { .. }));
        assert!(err.to_string().contains("token acquisition failed"));
        assert_eq!(err.category(), "token_acquisition");
    }

    #[test]
    fn test_upstream_error_keeps_status_and_body() {
        let err = Error::upstream(StatusCode::IM_A_TEAPOT, "blocked");
        match &err {
            Error::Upstream { status, body } => {
                assert_eq!(*status, StatusCode::IM_A_TEAPOT);
                assert_eq!(body, "blocked");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(err.to_string().contains("418"));
    }

    #[test]
    fn test_retry_exhausted_error() {
        let err = Error::retry_exhausted("ERR_INVALID_VQD");
        assert!(matches!(err, Error::RetryExhausted { .. }));
        assert!(err.to_string().contains("ERR_INVALID_VQD"));
    }

    #[test]
    fn test_stream_errors_are_distinct() {
        let read = Error::stream_read("connection reset");
        let decode = Error::stream_decode("bad event");
        assert_eq!(read.category(), "stream_read");
        assert_eq!(decode.category(), "stream_decode");
    }

    #[test]
    fn test_validation_error() {
        let err = Error::validation("model", "unsupported model: gpt-5");
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("unsupported model"));
    }
}
