//! HTTP request handlers
//!
//! Implementation of the gateway REST endpoints: health, model catalogue,
//! full chat completions, SSE streaming chat, and session clearing.

use crate::chat::{ChatStream, Model, StreamEvent};
use crate::server::app::AppState;
use crate::types::{
    ChatRequest, ChatResponse, ClearResponse, ErrorResponse, HealthResponse, ModelsResponse,
    StreamResponse,
};
use crate::utils::version;
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
};
use futures_util::stream;
use serde::Deserialize;
use serde_json::json;

/// Index document
///
/// GET /
///
/// Lists the available endpoints.
pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "name": "DuckChat Gateway",
        "version": version::get_version(),
        "description": "Streaming REST gateway for DuckDuckGo AI chat",
        "endpoints": {
            "health": "GET /api/v1/health",
            "models": "GET /api/v1/models",
            "chat": "POST /api/v1/chat/completions",
            "chat_stream": "POST /api/v1/chat/stream",
            "clear": "DELETE /api/v1/chat/clear",
        },
    }))
}

/// Health check endpoint
///
/// GET /api/v1/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Model catalogue endpoint
///
/// GET /api/v1/models
pub async fn models() -> Json<ModelsResponse> {
    Json(ModelsResponse::new(Model::catalogue()))
}

/// Full chat completion endpoint
///
/// POST /api/v1/chat/completions
///
/// Sends one turn and drains the whole reply before responding.
pub async fn chat_completion(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_chat_request(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let model = match validate_model(&request) {
        Ok(model) => model,
        Err(response) => return response,
    };

    let (session_id, session) = match state
        .registry
        .get_or_create(request.session_id.as_deref(), model)
        .await
    {
        Ok(entry) => entry,
        Err(e) => {
            tracing::error!("failed to create chat session: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Could not create chat session: {}", e),
            );
        }
    };
    let model_id = session.model().await.id();

    let stream = match session.send(&request.message).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!("chat turn failed: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Chat error: {}", e),
            );
        }
    };

    match stream.collect_text().await {
        Ok(text) => {
            (StatusCode::OK, Json(ChatResponse::new(text, model_id, session_id))).into_response()
        }
        Err(e) => {
            tracing::error!("stream failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Stream error: {}", e),
            )
        }
    }
}

/// Streaming chat endpoint
///
/// POST /api/v1/chat/stream
///
/// Re-emits decoded fragments as server-sent events named `chunk`,
/// terminated by a single `done` or `error` event.
pub async fn chat_stream(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_chat_request(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let model = match validate_model(&request) {
        Ok(model) => model,
        Err(response) => return response,
    };

    let (session_id, session) = match state
        .registry
        .get_or_create(request.session_id.as_deref(), model)
        .await
    {
        Ok(entry) => entry,
        Err(e) => {
            tracing::error!("failed to create chat session: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Could not create chat session: {}", e),
            );
        }
    };

    match session.send(&request.message).await {
        Ok(stream) => fragment_events(stream, session_id),
        Err(e) => {
            tracing::error!("chat turn failed: {}", e);
            let event = Event::default()
                .event("error")
                .json_data(StreamResponse::error(format!("Chat error: {}", e), &session_id));
            Sse::new(stream::iter(vec![event])).into_response()
        }
    }
}

/// Clear a session's conversation
///
/// DELETE /api/v1/chat/clear?session_id=...
pub async fn clear_chat(
    State(state): State<AppState>,
    Query(params): Query<ClearParams>,
) -> Response {
    let Some(session_id) = params.session_id.filter(|id| !id.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "session_id required");
    };

    match state.registry.get(&session_id) {
        Some(session) => {
            session.clear().await;
            tracing::info!("cleared session {}", session_id);
            Json(ClearResponse::new(session_id)).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "Session not found"),
    }
}

/// Query parameters for the clear endpoint
#[derive(Debug, Deserialize)]
pub struct ClearParams {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Convert a chat stream into the SSE response
fn fragment_events(chat_stream: ChatStream, session_id: String) -> Response {
    enum Phase {
        Streaming(ChatStream),
        Finished,
    }

    let events = stream::unfold(
        (Phase::Streaming(chat_stream), session_id),
        |(phase, session_id)| async move {
            match phase {
                Phase::Streaming(mut chat_stream) => {
                    let (event, next) = match chat_stream.next_event().await {
                        StreamEvent::Fragment(chunk) => (
                            Event::default()
                                .event("chunk")
                                .json_data(StreamResponse::chunk(chunk, &session_id)),
                            Phase::Streaming(chat_stream),
                        ),
                        StreamEvent::Done => (
                            Event::default()
                                .event("done")
                                .json_data(StreamResponse::done(&session_id)),
                            Phase::Finished,
                        ),
                        StreamEvent::Failed(e) => (
                            Event::default().event("error").json_data(
                                StreamResponse::error(format!("Stream error: {}", e), &session_id),
                            ),
                            Phase::Finished,
                        ),
                    };
                    Some((event, (next, session_id)))
                }
                Phase::Finished => None,
            }
        },
    );

    Sse::new(events).keep_alive(KeepAlive::default()).into_response()
}

fn parse_chat_request(body: &Bytes) -> Result<ChatRequest, Response> {
    let request: ChatRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("invalid chat request: {}", e);
        error_response(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e))
    })?;

    if request.message.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "message required"));
    }

    Ok(request)
}

/// Resolve the requested model.
///
/// An absent or empty selector returns `None`: the registry then keeps an
/// existing session's model untouched and uses the default for a new one.
fn validate_model(request: &ChatRequest) -> Result<Option<Model>, Response> {
    match request.model.as_deref() {
        None | Some("") => Ok(None),
        Some(selector) => selector
            .parse::<Model>()
            .map(Some)
            .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string())),
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message, status.as_u16()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let Json(value) = index().await;
        assert_eq!(value["name"], "DuckChat Gateway");
        assert_eq!(value["endpoints"]["chat"], "POST /api/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_health_handler() {
        let Json(response) = health().await;
        assert_eq!(response.status, "ok");
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_models_handler() {
        let Json(response) = models().await;
        assert!(response.success);
        assert_eq!(response.count, 5);
        assert_eq!(response.models.len(), 5);
    }

    #[test]
    fn test_parse_chat_request_rejects_bad_json() {
        assert!(parse_chat_request(&Bytes::from_static(b"{broken")).is_err());
    }

    #[test]
    fn test_parse_chat_request_rejects_empty_message() {
        assert!(parse_chat_request(&Bytes::from_static(b"{\"message\":\"\"}")).is_err());
    }

    #[test]
    fn test_validate_model_accepts_aliases() {
        let request = ChatRequest::new("hi").with_model("claude");
        assert_eq!(
            validate_model(&request).unwrap(),
            Some(Model::Claude3Haiku)
        );
    }

    #[test]
    fn test_validate_model_absent_means_no_override() {
        let request = ChatRequest::new("hi");
        assert_eq!(validate_model(&request).unwrap(), None);
    }

    #[test]
    fn test_validate_model_rejects_unknown() {
        let request = ChatRequest::new("hi").with_model("gpt-5");
        assert!(validate_model(&request).is_err());
    }
}
