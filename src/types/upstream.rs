//! Upstream wire protocol types
//!
//! Shapes the remote chat service expects on its `POST` chat endpoint and
//! emits inside its event stream. Field names and casing follow the
//! reverse-engineered browser traffic exactly; changing them breaks the
//! anti-automation check.

use crate::chat::Model;
use serde::{Deserialize, Serialize};

/// Message role within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Caller-authored message
    User,
    /// Upstream model reply
    Assistant,
}

/// One conversation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message text
    pub content: String,
    /// Author role
    pub role: Role,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: Role::User,
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: Role::Assistant,
        }
    }
}

/// Upstream tool selection flags
///
/// Always sent with every flag disabled; the protocol still requires the
/// block to be present.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ToolChoice {
    #[serde(rename = "NewsSearch")]
    pub news_search: bool,
    #[serde(rename = "VideosSearch")]
    pub videos_search: bool,
    #[serde(rename = "LocalSearch")]
    pub local_search: bool,
    #[serde(rename = "WeatherForecast")]
    pub weather_forecast: bool,
}

/// Request metadata wrapper
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "toolChoice")]
    pub tool_choice: ToolChoice,
}

/// Chat turn request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPayload {
    /// Selected upstream model
    pub model: Model,
    /// Tool-choice block, all flags disabled
    pub metadata: Metadata,
    /// Full conversation history including the new user message
    pub messages: Vec<Message>,
    /// Protocol-level tool flag, kept always-on per upstream contract even
    /// though no tool is ever selected
    #[serde(rename = "canUseTools")]
    pub can_use_tools: bool,
}

impl ChatPayload {
    /// Build the turn payload for a model and history snapshot
    pub fn new(model: Model, messages: Vec<Message>) -> Self {
        Self {
            model,
            metadata: Metadata::default(),
            messages,
            can_use_tools: true,
        }
    }
}

/// One decoded event from the upstream `text/event-stream` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamEventPayload {
    /// Incremental answer text; empty events carry metadata only
    #[serde(default)]
    pub message: String,
}
