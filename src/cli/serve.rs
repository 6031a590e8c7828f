//! Server mode CLI logic
//!
//! Contains the core logic for running the HTTP server mode.

use crate::{Settings, config::ConfigLoader, server::app, utils::version};
use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Arguments for server mode
#[derive(Debug)]
pub struct ServeArgs {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub config: Option<String>,
    pub verbose: bool,
}

/// Run server mode with the given arguments
pub async fn run_serve_mode(args: ServeArgs) -> Result<()> {
    // Load configuration before initializing logging so logging.level from
    // the config file can take effect.
    //
    // Configuration precedence:
    // 1. Command line arguments (highest priority)
    // 2. Environment variables
    // 3. Configuration file (from --config, DUCKCHAT_CONFIG or default location)
    // 4. Default values (lowest priority)
    let config_loader = ConfigLoader::new();

    let config_path = if let Some(config) = &args.config {
        Some(std::path::PathBuf::from(config))
    } else {
        ConfigLoader::get_config_path()
    };

    let mut settings = config_loader
        .load(config_path.as_deref())
        .unwrap_or_else(|e| {
            // Can't use tracing here since it's not initialized yet
            eprintln!(
                "Warning: Failed to load configuration: {}. Using defaults.",
                e
            );
            Settings::default()
        });

    // Override with CLI arguments if provided (highest priority)
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.logging.verbose = args.verbose;

    init_logging(args.verbose, &settings.logging.level);

    tracing::info!("Starting DuckChat Gateway v{}", version::get_version());

    let app = app::create_app(settings.clone());

    let addr = parse_listen_address(&settings.server.host, settings.server.port)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        "DuckChat Gateway v{} listening on {}",
        version::get_version(),
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize the tracing subscriber.
///
/// Level precedence: CLI `--verbose` > `RUST_LOG` environment variable >
/// config `logging.level` > `info`.
fn init_logging(verbose: bool, configured_level: &str) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(configured_level)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Parse the configured host into a listen address.
///
/// Accepts any literal IP address, `::` for IPv6 any and `0.0.0.0` for
/// IPv4 any.
pub fn parse_listen_address(host: &str, port: u16) -> Result<std::net::SocketAddr> {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    match host {
        "::" => Ok(SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port)),
        "0.0.0.0" => Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)),
        _ => anyhow::bail!(
            "Invalid host address: {}. Use '::' for IPv6 or '0.0.0.0' for IPv4",
            host
        ),
    }
}
