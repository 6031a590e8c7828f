//! Type definitions for the gateway API and the upstream wire protocol

pub mod request;
pub mod response;
pub mod upstream;

pub use request::ChatRequest;
pub use response::{
    ChatResponse, ClearResponse, ErrorResponse, HealthResponse, ModelInfo, ModelsResponse,
    StreamResponse,
};
pub use upstream::{ChatPayload, Message, Metadata, Role, StreamEventPayload, ToolChoice};
