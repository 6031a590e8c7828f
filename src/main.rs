//! Unified CLI for the DuckChat Gateway
//!
//! This is the main binary that provides both server and one-shot modes
//! through a unified command-line interface using subcommands.
//!
//! # Usage
//!
//! ## Server Mode
//! ```bash
//! duckchat-gateway serve --port 8080 --host 0.0.0.0
//! ```
//!
//! ## One-shot Mode
//! ```bash
//! duckchat-gateway --message "Explain borrowing in Rust" --model llama
//! ```
//!
//! ## Help and Version
//! ```bash
//! duckchat-gateway --version
//! duckchat-gateway --help
//! duckchat-gateway serve --help
//! ```

use clap::{Parser, Subcommand};

use duckchat_gateway::cli::{
    ask::{AskArgs, run_ask_mode},
    serve::{ServeArgs, run_serve_mode},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "duckchat-gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    // One-shot mode options (when no subcommand is provided)
    /// Message to send
    #[arg(short, long, value_name = "MESSAGE")]
    message: Option<String>,

    /// Model identifier or alias (gpt-4o-mini, claude, llama, mixtral, o4mini)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Configuration file path
        #[arg(long)]
        config: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            port,
            host,
            config,
            verbose,
        }) => {
            let args = ServeArgs {
                port,
                host,
                config,
                verbose,
            };
            run_serve_mode(args).await
        }
        None => {
            let Some(message) = cli.message else {
                anyhow::bail!("either pass --message for a one-shot turn or use the serve subcommand");
            };
            let args = AskArgs {
                message,
                model: cli.model,
                config: cli.config,
                verbose: cli.verbose,
            };
            run_ask_mode(args).await
        }
    }
}
