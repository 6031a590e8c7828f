//! Protocol session client for the upstream chat service
//!
//! This module owns the conversation state machine: VQD token acquisition,
//! per-turn request construction with anti-bot telemetry, the bounded
//! refresh-and-retry policy, and the streaming decoder that turns a live
//! event-stream body into ordered text fragments.

pub mod headers;
pub mod model;
pub mod registry;
pub mod session;
pub mod stream;
pub mod telemetry;
pub mod token;

pub use model::Model;
pub use registry::SessionRegistry;
pub use session::{ChatSession, ChatSessionGeneric};
pub use stream::{ChatStream, StreamEvent};
pub use telemetry::TelemetryHeaders;
pub use token::{TokenSource, VqdTokenProvider};
