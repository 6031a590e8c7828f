//! One-shot mode CLI logic
//!
//! Sends a single chat turn from the command line, printing fragments to
//! stdout as they arrive.

use crate::chat::{ChatSession, Model, StreamEvent};
use crate::config::ConfigLoader;
use crate::Settings;
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Arguments for one-shot mode
#[derive(Debug)]
pub struct AskArgs {
    pub message: String,
    pub model: Option<String>,
    pub config: Option<String>,
    pub verbose: bool,
}

/// Run one-shot mode with the given arguments
pub async fn run_ask_mode(args: AskArgs) -> Result<()> {
    // Keep stdout clean for the answer; logs default to warnings only
    let env_filter = if args.verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_loader = ConfigLoader::new();
    let config_path = if let Some(config) = &args.config {
        Some(std::path::PathBuf::from(config))
    } else {
        ConfigLoader::get_config_path()
    };
    let settings = config_loader
        .load(config_path.as_deref())
        .unwrap_or_else(|e| {
            eprintln!(
                "Warning: Failed to load configuration: {}. Using defaults.",
                e
            );
            Settings::default()
        });

    let model: Model = args.model.as_deref().unwrap_or("").parse()?;

    let session = Arc::new(
        ChatSession::create(model, Arc::new(settings))
            .await
            .context("could not open a chat session")?,
    );

    let mut stream = session.send(&args.message).await.context("chat turn failed")?;

    let mut stdout = std::io::stdout();
    loop {
        match stream.next_event().await {
            StreamEvent::Fragment(fragment) => {
                stdout.write_all(fragment.as_bytes())?;
                stdout.flush()?;
            }
            StreamEvent::Done => break,
            StreamEvent::Failed(e) => {
                writeln!(stdout)?;
                return Err(anyhow::anyhow!(e).context("stream failed"));
            }
        }
    }
    writeln!(stdout)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_args_model_parsing() {
        let args = AskArgs {
            message: "hi".to_string(),
            model: Some("claude".to_string()),
            config: None,
            verbose: false,
        };
        let model: Model = args.model.as_deref().unwrap_or("").parse().unwrap();
        assert_eq!(model, Model::Claude3Haiku);
    }

    #[test]
    fn test_ask_args_default_model() {
        let args = AskArgs {
            message: "hi".to_string(),
            model: None,
            config: None,
            verbose: false,
        };
        let model: Model = args.model.as_deref().unwrap_or("").parse().unwrap();
        assert_eq!(model, Model::Gpt4oMini);
    }
}
