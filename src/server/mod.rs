//! HTTP server front door
//!
//! Exposes the protocol session client over a small REST API with full and
//! streaming chat endpoints.

pub mod app;
pub mod handlers;

pub use app::{create_app, AppState};
