//! VQD token acquisition
//!
//! The upstream service hands out a short-lived authorization token through
//! a response header on its status endpoint. Acquisition is a single
//! bounded-timeout request; the retry policy lives with the session, not
//! here.

use crate::chat::headers::{self, TOKEN_HEADER};
use crate::config::Settings;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Source of VQD session tokens.
///
/// Abstracted so the session client can be exercised in tests with an
/// injected token source instead of the live status endpoint.
#[async_trait]
pub trait TokenSource: Send + Sync + 'static {
    /// Acquire a fresh token.
    ///
    /// A returned `Ok` value is never empty; every failure mode
    /// (unreachable endpoint, timeout, missing header) is an `Err`.
    /// Implementations must not retry internally.
    async fn acquire(&self) -> Result<String>;
}

/// Token provider backed by the upstream status endpoint
#[derive(Debug, Clone)]
pub struct VqdTokenProvider {
    settings: Arc<Settings>,
}

impl VqdTokenProvider {
    /// Create a provider for the configured status endpoint
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl TokenSource for VqdTokenProvider {
    async fn acquire(&self) -> Result<String> {
        let status_url = Url::parse(&self.settings.upstream.status_url)?;
        let client = Client::builder()
            .cookie_provider(headers::seeded_cookie_jar(&status_url))
            .timeout(Duration::from_secs(self.settings.upstream.acquire_timeout))
            .build()?;

        let response = client
            .get(status_url)
            .headers(headers::status_headers())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("token acquisition request failed: {}", e);
                Error::token_acquisition(format!("status request failed: {}", e))
            })?;

        let token = response
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if token.is_empty() {
            tracing::warn!("status response carried no {} header", TOKEN_HEADER);
            return Err(Error::token_acquisition(format!(
                "status response carried no {} header",
                TOKEN_HEADER
            )));
        }

        tracing::debug!("acquired VQD token ({} chars)", token.len());
        Ok(token)
    }
}
