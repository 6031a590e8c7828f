//! Axum application setup
//!
//! Creates and configures the Axum application with routes and middleware.

use crate::chat::SessionRegistry;
use crate::config::Settings;
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Session registry, the only state shared across callers
    pub registry: Arc<SessionRegistry>,
    /// Application settings
    pub settings: Arc<Settings>,
}

/// Create the main Axum application with routes and middleware
pub fn create_app(settings: Settings) -> Router {
    let settings = Arc::new(settings);
    let registry = Arc::new(SessionRegistry::new(settings.clone()));

    let state = AppState {
        registry,
        settings: settings.clone(),
    };

    let mut app = Router::new()
        .route("/", get(super::handlers::index))
        .route("/api/v1/health", get(super::handlers::health))
        .route("/api/v1/models", get(super::handlers::models))
        .route(
            "/api/v1/chat/completions",
            post(super::handlers::chat_completion),
        )
        .route("/api/v1/chat/stream", post(super::handlers::chat_stream))
        .route("/api/v1/chat/clear", delete(super::handlers::clear_chat))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    if settings.server.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app() {
        let settings = Settings::default();
        let _app = create_app(settings);

        // Test passes if create_app doesn't panic during Router construction
        // The Router type itself validates correct configuration at compile time
    }

    #[test]
    fn test_create_app_without_cors() {
        let mut settings = Settings::default();
        settings.server.enable_cors = false;
        let _app = create_app(settings);
    }
}
