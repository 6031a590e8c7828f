//! Command-line interface logic
//!
//! Contains the core logic for the server and one-shot modes behind the
//! binary's argument parsing.

pub mod ask;
pub mod serve;

pub use ask::{run_ask_mode, AskArgs};
pub use serve::{run_serve_mode, ServeArgs};
