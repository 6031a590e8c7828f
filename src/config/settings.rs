//! Configuration settings
//!
//! Provides configuration loading from environment variables, configuration
//! files, and command-line overrides. The telemetry section carries the
//! opaque anti-automation header values; they are fingerprints of a
//! specific upstream front-end build, rotated by the operator rather than
//! derived here.

use serde::{Deserialize, Serialize};

// Helper functions for serde defaults
fn default_host() -> String {
    "::".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_status_url() -> String {
    "https://duckduckgo.com/duckchat/v1/status".to_string()
}

fn default_chat_url() -> String {
    "https://duckduckgo.com/duckchat/v1/chat".to_string()
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fe_signals() -> String {
    "eyJzdGFydCI6MTc0OTgyODU3NzE1NiwiZXZlbnRzIjpbeyJuYW1lIjoic3RhcnROZXdDaGF0IiwiZGVsdGEiOjYwfV0sImVuZCI6NTM4MX0=".to_string()
}

fn default_fe_version() -> String {
    "serp_20250613_094749_ET-cafd73f97f51c983eb30".to_string()
}

fn default_vqd_hash() -> String {
    "eyJzZXJ2ZXJfaGFzaGVzIjpbIm5oWlUrcVZ3d3dzODFPVStDTm4vVkZJcS9DbXBSeGxYY2E5cHpGQ0JVZUk9IiwiajRNNmNBRzRheVFqQ21kWkN0a1IzOFY3eVRpd1gvZ2RmcDFueFhEdlV3cz0iXSwiY2xpZW50X2hhc2hlcyI6WyJpRTNqeXRnSm0xZGJaZlo1bW81M1NmaVAxdXUxeEdzY0F5RnB3V2NVOUtrPSIsInJaRGtaR2h4S0JEL1JuY00xVVNraHZNM3pLdEJzQmlzSlJTWFF4L2QzRFU9Il0sInNpZ25hbHMiOnt9LCJtZXRhIjp7InYiOiIzIiwiY2hhbGxlbmdlX2lkIjoiODU3NjA5YjlmMTg2NThlMWM0MzZhZWI2MGM0MDc1ZjdhYWNmYmI0OTlhY2Y4NTVmNDJkNWRjZmM5MTViNDhiOGg4amJ0IiwidGltZXN0YW1wIjoiMTc0OTgyODU3NjQ5NyIsIm9yaWdpbiI6Imh0dHBzOi8vZHVja2R1Y2tnby5jb20iLCJzdGFjayI6IkVycm9yXG5hdCBiYSAoaHR0cHM6Ly9kdWNrZHVja2dvLmNvbS9kaXN0L3dwbS5jaGF0LmNhZmQ3M2Y5N2Y1MWM5ODNlYjMwLmpzOjE6NzQ4MDMpXG5hdCBhc3luYyBkaXNwYXRjaFNlcnZpY2VJbml0aWFsVlFEIChodHRwczovL2R1Y2tkdWNrZ28uY29tL2Rpc3Qvd3BtLmNoYXQuY2FmZDczZjk3ZjUxYzk4M2ViMzAuanM6MTo5OTUyOSkifX0=".to_string()
}

/// Main configuration settings for the gateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerSettings,
    /// Upstream chat service configuration
    #[serde(default)]
    pub upstream: UpstreamSettings,
    /// Anti-automation telemetry header values
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

/// Upstream chat service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// Status endpoint used for VQD token acquisition
    #[serde(default = "default_status_url")]
    pub status_url: String,
    /// Chat completion endpoint
    #[serde(default = "default_chat_url")]
    pub chat_url: String,
    /// Token acquisition timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout: u64,
    /// Chat turn timeout in seconds, covering the streamed body
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Maximum refresh-and-retry attempts after an anti-bot rejection
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff before each retry, in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

/// Anti-automation telemetry header values
///
/// Opaque values captured from a real browser session. The upstream service
/// rejects turns that do not carry them; when the front-end build they were
/// captured from expires, the operator replaces them via config or
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// `x-fe-signals` header value
    #[serde(default = "default_fe_signals")]
    pub fe_signals: String,
    /// `x-fe-version` header value
    #[serde(default = "default_fe_version")]
    pub fe_version: String,
    /// `x-vqd-hash-1` header value; omitted from requests when empty
    #[serde(default = "default_vqd_hash")]
    pub vqd_hash: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            status_url: default_status_url(),
            chat_url: default_chat_url(),
            acquire_timeout: default_acquire_timeout(),
            request_timeout: default_request_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            fe_signals: default_fe_signals(),
            fe_version: default_fe_version(),
            vqd_hash: default_vqd_hash(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings = toml::from_str(&contents)?;
        Ok(settings)
    }

    /// Load settings from environment variables only
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Override settings with environment variables where present
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(host) = std::env::var("DUCKCHAT_SERVER_HOST") {
            self.server.host = host;
        }

        // PORT is what the original deployment used; keep honoring it
        if let Ok(port) = std::env::var("DUCKCHAT_SERVER_PORT").or_else(|_| std::env::var("PORT")) {
            self.server.port = port
                .parse()
                .map_err(|e| crate::Error::config("port", &format!("Invalid port: {}", e)))?;
        }

        if let Ok(url) = std::env::var("DUCKCHAT_STATUS_URL") {
            self.upstream.status_url = url;
        }

        if let Ok(url) = std::env::var("DUCKCHAT_CHAT_URL") {
            self.upstream.chat_url = url;
        }

        if let Ok(signals) = std::env::var("DUCKCHAT_FE_SIGNALS") {
            self.telemetry.fe_signals = signals;
        }

        if let Ok(version) = std::env::var("DUCKCHAT_FE_VERSION") {
            self.telemetry.fe_version = version;
        }

        if let Ok(hash) = std::env::var("DUCKCHAT_VQD_HASH") {
            self.telemetry.vqd_hash = hash;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(verbose) = std::env::var("VERBOSE") {
            self.logging.verbose = verbose.parse().unwrap_or(false);
        }

        Ok(self)
    }

    /// Validate the final configuration
    pub fn validate(&self) -> crate::Result<()> {
        url::Url::parse(&self.upstream.status_url)
            .map_err(|e| crate::Error::config("upstream.status_url", &format!("{}", e)))?;
        url::Url::parse(&self.upstream.chat_url)
            .map_err(|e| crate::Error::config("upstream.chat_url", &format!("{}", e)))?;

        if self.upstream.request_timeout == 0 {
            return Err(crate::Error::config(
                "upstream.request_timeout",
                "timeout must be non-zero",
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(crate::Error::config(
                "logging.level",
                &format!("unknown log level: {}", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(
            settings.upstream.status_url,
            "https://duckduckgo.com/duckchat/v1/status"
        );
        assert_eq!(settings.upstream.acquire_timeout, 10);
        assert_eq!(settings.upstream.request_timeout, 30);
        assert_eq!(settings.upstream.max_retries, 3);
        assert!(!settings.telemetry.fe_signals.is_empty());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[server]
port = 9000

[upstream]
max_retries = 5
        "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "::");
        assert_eq!(settings.upstream.max_retries, 5);
        assert_eq!(settings.upstream.retry_backoff_ms, 2000);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_telemetry_override_via_toml() {
        let settings: Settings = toml::from_str(
            r#"
[telemetry]
fe_signals = "rotated-signals"
fe_version = "serp_20260101_000000"
vqd_hash = ""
        "#,
        )
        .unwrap();

        assert_eq!(settings.telemetry.fe_signals, "rotated-signals");
        assert_eq!(settings.telemetry.fe_version, "serp_20260101_000000");
        assert!(settings.telemetry.vqd_hash.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut settings = Settings::default();
        settings.upstream.chat_url = "not a url".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        assert!(settings.validate().is_err());
    }
}
