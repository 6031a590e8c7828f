//! Request type definitions
//!
//! Defines the structure for gateway chat requests.

use serde::{Deserialize, Serialize};

/// Chat request accepted by the completion and streaming endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message text
    pub message: String,

    /// Model identifier or alias; empty/absent selects the default model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Session identifier; generated by the gateway when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Create a request with just a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            model: None,
            session_id: None,
        }
    }

    /// Set the model selector
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the session identifier
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let req = ChatRequest::new("hello")
            .with_model("claude")
            .with_session_id("session_1");
        assert_eq!(req.message, "hello");
        assert_eq!(req.model.as_deref(), Some("claude"));
        assert_eq!(req.session_id.as_deref(), Some("session_1"));
    }

    #[test]
    fn test_optional_fields_deserialize() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.model.is_none());
        assert!(req.session_id.is_none());
    }
}
