//! Response type definitions
//!
//! Defines the structures returned by the gateway endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full (drained) chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Complete assistant reply
    pub message: String,
    /// Upstream model identifier the session used
    pub model: String,
    /// Session identifier, for follow-up turns
    pub session_id: String,
    /// Always true on the success path
    pub success: bool,
}

impl ChatResponse {
    /// Create a successful chat response
    pub fn new(
        message: impl Into<String>,
        model: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            model: model.into(),
            session_id: session_id.into(),
            success: true,
        }
    }
}

/// One event emitted by the streaming chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamResponse {
    /// Incremental answer fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<String>,
    /// True on the terminal event
    pub done: bool,
    /// Session identifier, for follow-up turns
    pub session_id: String,
    /// Error description on the failure path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamResponse {
    /// Create a fragment event
    pub fn chunk(chunk: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            chunk: Some(chunk.into()),
            done: false,
            session_id: session_id.into(),
            error: None,
        }
    }

    /// Create the terminal success event
    pub fn done(session_id: impl Into<String>) -> Self {
        Self {
            chunk: None,
            done: true,
            session_id: session_id.into(),
            error: None,
        }
    }

    /// Create the terminal error event
    pub fn error(error: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            chunk: None,
            done: true,
            session_id: session_id.into(),
            error: Some(error.into()),
        }
    }
}

/// Catalogue entry returned by the models endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Upstream model identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Short description
    pub description: String,
    /// Primary request alias
    pub alias: String,
}

/// Models endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Available models
    pub models: Vec<ModelInfo>,
    /// Always true
    pub success: bool,
    /// Number of available models
    pub count: usize,
}

impl ModelsResponse {
    /// Create a models response
    pub fn new(models: Vec<ModelInfo>) -> Self {
        let count = models.len();
        Self {
            models,
            success: true,
            count,
        }
    }
}

/// Health endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status, `"ok"` while serving
    pub status: String,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
    /// Current server time
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Create a healthy response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            service: "DuckChat Gateway".to_string(),
            version: crate::utils::version::get_version().to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Clear endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    /// Always true on the success path
    pub success: bool,
    /// Human-readable confirmation
    pub message: String,
    /// The cleared session
    pub session_id: String,
}

impl ClearResponse {
    /// Create a clear confirmation
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "Session cleared".to_string(),
            session_id: session_id.into(),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// HTTP status code mirrored into the body
    pub code: u16,
    /// Always false
    pub success: bool,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            success: false,
        }
    }
}
