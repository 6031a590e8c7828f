//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests against a
//! mocked upstream chat service.

#![allow(dead_code)]

use duckchat_gateway::Settings;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token the mocked status endpoint hands out
pub const INITIAL_TOKEN: &str = "vqd-initial";

/// Token the mocked chat endpoint rotates in on success
pub const ROTATED_TOKEN: &str = "vqd-rotated";

/// Settings pointed at a mock upstream, with a fast retry backoff
pub fn upstream_settings(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.upstream.status_url = format!("{}/duckchat/v1/status", server.uri());
    settings.upstream.chat_url = format!("{}/duckchat/v1/chat", server.uri());
    settings.upstream.retry_backoff_ms = 1;
    settings
}

/// Mount the status endpoint returning the given token
pub async fn mount_status(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/duckchat/v1/status"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-vqd-4", token))
        .mount(server)
        .await;
}

/// Event-stream response template for the given fragments, rotating the
/// session token
pub fn sse_response(fragments: &[&str]) -> ResponseTemplate {
    let mut body = String::new();
    for fragment in fragments {
        body.push_str(&format!("data: {{\"message\":\"{}\"}}\n", fragment));
    }
    body.push_str("data: [DONE]\n");

    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .insert_header("x-vqd-4", ROTATED_TOKEN)
        .set_body_string(body)
}

/// Mount the chat endpoint streaming the given fragments
pub async fn mount_chat(server: &MockServer, fragments: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/duckchat/v1/chat"))
        .and(header_exists("x-vqd-4"))
        .and(header_exists("x-fe-signals"))
        .and(header_exists("x-fe-version"))
        .respond_with(sse_response(fragments))
        .mount(server)
        .await;
}
