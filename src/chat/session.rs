//! Chat session state machine
//!
//! A session owns one conversation with the upstream service: the rotating
//! VQD token pair, the message history, the bounded anti-bot retry counter
//! and an exclusively-owned transport (HTTP client with its own cookie
//! jar). Turns on one session are serialized through the session mutex; the
//! guard travels with the decode task so the next turn can only start once
//! the previous reply has been fully settled into the history.

use crate::chat::headers::{self, INVALID_TOKEN_MARKER, TOKEN_HEADER};
use crate::chat::model::Model;
use crate::chat::stream::{self, ChatStream};
use crate::chat::telemetry::TelemetryHeaders;
use crate::chat::token::{TokenSource, VqdTokenProvider};
use crate::config::Settings;
use crate::types::upstream::{ChatPayload, Message};
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Mutable per-session state, guarded by the session mutex
#[derive(Debug)]
pub struct SessionState {
    /// Token used before the most recent rotation, kept for diagnostics
    pub(crate) old_token: String,
    /// Token attached to the next dispatched turn; never empty at dispatch
    pub(crate) token: String,
    /// Active model; changed only by explicit caller override
    pub(crate) model: Model,
    /// Conversation history, alternating user/assistant
    pub(crate) history: Vec<Message>,
    /// Anti-bot retries consumed by the current turn; reset on success
    pub(crate) retry_count: u32,
}

/// Convenience alias for the session with the live token provider
pub type ChatSession = ChatSessionGeneric<VqdTokenProvider>;

/// One conversation with the upstream chat service
#[derive(Debug)]
pub struct ChatSessionGeneric<T: TokenSource = VqdTokenProvider> {
    state: Arc<Mutex<SessionState>>,
    client: Client,
    telemetry: TelemetryHeaders,
    settings: Arc<Settings>,
    token_source: Arc<T>,
}

impl ChatSessionGeneric<VqdTokenProvider> {
    /// Create a session against the configured upstream.
    ///
    /// Acquires the initial token; a failed acquisition fails the creation.
    pub async fn create(model: Model, settings: Arc<Settings>) -> Result<Self> {
        let token_source = Arc::new(VqdTokenProvider::new(settings.clone()));
        Self::create_with_source(model, settings, token_source).await
    }
}

impl<T: TokenSource> ChatSessionGeneric<T> {
    /// Create a session with an injected token source
    pub async fn create_with_source(
        model: Model,
        settings: Arc<Settings>,
        token_source: Arc<T>,
    ) -> Result<Self> {
        let token = token_source.acquire().await?;

        let chat_url = Url::parse(&settings.upstream.chat_url)?;
        let client = Client::builder()
            .cookie_provider(headers::seeded_cookie_jar(&chat_url))
            .timeout(Duration::from_secs(settings.upstream.request_timeout))
            .build()?;

        let telemetry = TelemetryHeaders::from_settings(&settings.telemetry);

        Ok(Self {
            state: Arc::new(Mutex::new(SessionState {
                old_token: token.clone(),
                token,
                model,
                history: Vec::new(),
                retry_count: 0,
            })),
            client,
            telemetry,
            settings,
            token_source,
        })
    }

    /// Send one user message and stream the assistant reply.
    ///
    /// Appends the user message to the history exactly once, then runs the
    /// dispatch loop: an anti-bot rejection (HTTP 418, 429, or an
    /// invalid-token body marker) refreshes the token and retries with the
    /// same history, bounded by the configured retry limit; any other
    /// non-success status fails the turn. On success the rotated token is
    /// taken from the response headers and the body is handed to the
    /// streaming decoder. The user message stays recorded when the turn
    /// fails, so the caller can retry without duplicating it.
    pub async fn send(&self, user_text: &str) -> Result<ChatStream> {
        let mut turn = self.state.clone().lock_owned().await;

        if turn.token.is_empty() {
            turn.token = self.token_source.acquire().await?;
        }

        turn.history.push(Message::user(user_text));

        loop {
            let payload = ChatPayload::new(turn.model, turn.history.clone());
            let mut request_headers = headers::chat_headers(&turn.token)?;
            self.telemetry.apply(&mut request_headers)?;

            let response = self
                .client
                .post(&self.settings.upstream.chat_url)
                .headers(request_headers)
                .json(&payload)
                .send()
                .await
                .map_err(|e| Error::transport(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                if let Some(refreshed) = response
                    .headers()
                    .get(TOKEN_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .filter(|value| !value.is_empty())
                {
                    turn.old_token = std::mem::replace(&mut turn.token, refreshed.to_string());
                }
                turn.retry_count = 0;
                return Ok(stream::spawn_turn_decoder(response, turn));
            }

            let body = response.text().await.unwrap_or_default();
            let rejected = status == StatusCode::IM_A_TEAPOT
                || status == StatusCode::TOO_MANY_REQUESTS
                || body.contains(INVALID_TOKEN_MARKER);
            if !rejected {
                return Err(Error::upstream(status, body));
            }

            tracing::warn!(status = %status, "anti-bot rejection, refreshing token");
            tokio::time::sleep(Duration::from_millis(self.settings.upstream.retry_backoff_ms))
                .await;

            match self.token_source.acquire().await {
                Ok(token) if turn.retry_count < self.settings.upstream.max_retries => {
                    turn.retry_count += 1;
                    turn.token = token;
                    tracing::info!(
                        "retrying turn (attempt {}/{})",
                        turn.retry_count,
                        self.settings.upstream.max_retries
                    );
                }
                _ => return Err(Error::retry_exhausted(body)),
            }
        }
    }

    /// Empty the history, re-acquire the token, and reset the retry count.
    ///
    /// A failed re-acquisition is swallowed: the session is left with an
    /// empty token and the next `send` attempts acquisition again.
    pub async fn clear(&self) {
        let mut turn = self.state.lock().await;
        turn.history.clear();
        let token = self.token_source.acquire().await.unwrap_or_else(|e| {
            tracing::warn!("token re-acquisition during clear failed: {}", e);
            String::new()
        });
        turn.old_token = token.clone();
        turn.token = token;
        turn.retry_count = 0;
    }

    /// Switch the active model; waits for any turn in flight
    pub async fn set_model(&self, model: Model) {
        let mut state = self.state.lock().await;
        if state.model != model {
            tracing::debug!("switching session model to {}", model);
            state.model = model;
        }
    }

    /// The active model
    pub async fn model(&self) -> Model {
        self.state.lock().await.model
    }

    /// Snapshot of the conversation history
    pub async fn history(&self) -> Vec<Message> {
        self.state.lock().await.history.clone()
    }

    /// Retries consumed by the most recent turn
    pub async fn retry_count(&self) -> u32 {
        self.state.lock().await.retry_count
    }

    /// Current and previous token values, for diagnostics
    pub async fn tokens(&self) -> (String, String) {
        let state = self.state.lock().await;
        (state.token.clone(), state.old_token.clone())
    }
}
