//! Anti-automation telemetry header bundle
//!
//! Three opaque values that must accompany every chat turn to satisfy the
//! upstream anti-automation check. They are static fingerprints of a
//! specific front-end build, supplied through configuration and rotated by
//! the operator; nothing here computes or validates them.

use crate::Result;
use crate::config::settings::TelemetrySettings;
use reqwest::header::{HeaderMap, HeaderValue};

/// Telemetry headers attached to every chat turn
#[derive(Debug, Clone)]
pub struct TelemetryHeaders {
    fe_signals: String,
    fe_version: String,
    vqd_hash: String,
}

impl TelemetryHeaders {
    /// Capture the configured values; fixed for the session's lifetime
    pub fn from_settings(settings: &TelemetrySettings) -> Self {
        Self {
            fe_signals: settings.fe_signals.clone(),
            fe_version: settings.fe_version.clone(),
            vqd_hash: settings.vqd_hash.clone(),
        }
    }

    /// The current telemetry values as `(signals, version, hash)`
    pub fn current(&self) -> (&str, &str, &str) {
        (&self.fe_signals, &self.fe_version, &self.vqd_hash)
    }

    /// Insert the telemetry headers into a request header map.
    ///
    /// `x-vqd-hash-1` is omitted when the configured value is empty, as the
    /// front-end does.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert("x-fe-signals", header_value("fe_signals", &self.fe_signals)?);
        headers.insert("x-fe-version", header_value("fe_version", &self.fe_version)?);
        if !self.vqd_hash.is_empty() {
            headers.insert("x-vqd-hash-1", header_value("vqd_hash", &self.vqd_hash)?);
        }
        Ok(())
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        crate::Error::config(field, &format!("value is not a valid header: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TelemetrySettings {
        TelemetrySettings {
            fe_signals: "signals".to_string(),
            fe_version: "serp_20250613".to_string(),
            vqd_hash: "hash".to_string(),
        }
    }

    #[test]
    fn test_apply_sets_all_three_headers() {
        let telemetry = TelemetryHeaders::from_settings(&sample());
        let mut headers = HeaderMap::new();
        telemetry.apply(&mut headers).unwrap();

        assert_eq!(headers.get("x-fe-signals").unwrap(), "signals");
        assert_eq!(headers.get("x-fe-version").unwrap(), "serp_20250613");
        assert_eq!(headers.get("x-vqd-hash-1").unwrap(), "hash");
    }

    #[test]
    fn test_empty_hash_is_omitted() {
        let mut settings = sample();
        settings.vqd_hash = String::new();
        let telemetry = TelemetryHeaders::from_settings(&settings);
        let mut headers = HeaderMap::new();
        telemetry.apply(&mut headers).unwrap();

        assert!(headers.get("x-vqd-hash-1").is_none());
        assert!(headers.get("x-fe-signals").is_some());
    }

    #[test]
    fn test_current_returns_configured_values() {
        let telemetry = TelemetryHeaders::from_settings(&sample());
        let (signals, version, hash) = telemetry.current();
        assert_eq!(signals, "signals");
        assert_eq!(version, "serp_20250613");
        assert_eq!(hash, "hash");
    }
}
