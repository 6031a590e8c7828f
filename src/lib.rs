//! DuckChat Gateway
//!
//! A self-hosted gateway that exposes DuckDuckGo's AI chat aggregation
//! service (which has no official API) as a small streaming REST API.
//! The library drives the reverse-engineered browser protocol: it acquires
//! the ephemeral VQD session token, attaches the anti-automation telemetry
//! headers to every turn, submits the running message history, and decodes
//! the server-sent-event response stream back into incremental text
//! fragments.
//!
//! # Features
//!
//! - **Multi-turn sessions**: per-session conversation history with
//!   isolated cookie state, addressable by caller-supplied identifiers
//! - **Streaming responses**: fragments are forwarded through a bounded
//!   channel as they are decoded, with backpressure on slow consumers
//! - **Anti-bot resilience**: automatic token refresh and bounded retry on
//!   HTTP 418/429 and invalid-token rejections
//! - **HTTP Server Mode**: axum REST API with full and streaming chat
//!   endpoints
//! - **One-shot Mode**: command-line interface for a single chat turn
//!
//! # Usage
//!
//! ## HTTP Server Mode
//!
//! ```bash
//! duckchat-gateway serve --port 8080 --host 0.0.0.0
//! ```
//!
//! ## One-shot Mode
//!
//! ```bash
//! duckchat-gateway --message "What is the capital of France?" --model claude
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use duckchat_gateway::{ChatSession, Model, Settings, StreamEvent};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Arc::new(Settings::default());
//! let session = Arc::new(ChatSession::create(Model::default(), settings).await?);
//! let mut stream = session.send("Hello there").await?;
//! loop {
//!     match stream.next_event().await {
//!         StreamEvent::Fragment(text) => print!("{}", text),
//!         StreamEvent::Done => break,
//!         StreamEvent::Failed(e) => return Err(e.into()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod types;
pub mod utils;

pub use chat::{ChatSession, ChatStream, Model, SessionRegistry, StreamEvent, TokenSource};
pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use types::{ChatRequest, ChatResponse, ErrorResponse, Message};
