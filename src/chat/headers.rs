//! Fixed browser-fingerprint headers and session cookies
//!
//! The upstream service only answers requests that look like its own web
//! front-end. The values below were captured from a real browser session
//! and must be sent verbatim on both the status and chat endpoints.

use crate::Result;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::Arc;
use url::Url;

/// Response/request header carrying the VQD session token
pub const TOKEN_HEADER: &str = "x-vqd-4";

/// Body marker signalling an invalid-token rejection
pub const INVALID_TOKEN_MARKER: &str = "ERR_INVALID_VQD";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";
const SEC_CH_UA: &str = r#""Brave";v="137", "Chromium";v="137", "Not/A)Brand";v="24""#;
const ACCEPT_LANGUAGE: &str = "fr-FR,fr;q=0.6";
const REFERER: &str = "https://duckduckgo.com/";
const ORIGIN: &str = "https://duckduckgo.com";

/// Cookie set the front-end establishes before its first chat call
const SESSION_COOKIES: &[(&str, &str)] = &[
    ("5", "1"),
    ("dcm", "3"),
    ("dcs", "1"),
    ("duckassist-opt-in-count", "1"),
    ("isRecentChatOn", "1"),
    ("preferredDuckAiModel", "3"),
];

/// Build a cookie jar pre-seeded with the fixed session cookies for the
/// given endpoint origin.
///
/// Each session gets its own jar; cookie state must never leak between
/// sessions.
pub fn seeded_cookie_jar(base: &Url) -> Arc<Jar> {
    let jar = Jar::default();
    for (name, value) in SESSION_COOKIES {
        jar.add_cookie_str(&format!("{}={}", name, value), base);
    }
    Arc::new(jar)
}

/// Shared browser-fingerprint header set
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("accept-language", HeaderValue::from_static(ACCEPT_LANGUAGE));
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert("priority", HeaderValue::from_static("u=1, i"));
    headers.insert("referer", HeaderValue::from_static(REFERER));
    headers.insert("sec-ch-ua", HeaderValue::from_static(SEC_CH_UA));
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    headers.insert("sec-gpc", HeaderValue::from_static("1"));
    headers.insert("user-agent", HeaderValue::from_static(USER_AGENT));
    headers
}

/// Header set for the status (token acquisition) endpoint
pub fn status_headers() -> HeaderMap {
    let mut headers = browser_headers();
    headers.insert("accept", HeaderValue::from_static("*/*"));
    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    headers.insert("x-vqd-accept", HeaderValue::from_static("1"));
    headers
}

/// Header set for a chat turn, carrying the current token
pub fn chat_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = browser_headers();
    headers.insert("accept", HeaderValue::from_static("text/event-stream"));
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers.insert("origin", HeaderValue::from_static(ORIGIN));
    headers.insert(
        TOKEN_HEADER,
        HeaderValue::from_str(token)
            .map_err(|e| crate::Error::internal(format!("token is not a valid header: {}", e)))?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_headers_request_a_token() {
        let headers = status_headers();
        assert_eq!(headers.get("x-vqd-accept").unwrap(), "1");
        assert_eq!(headers.get("accept").unwrap(), "*/*");
        assert!(headers.get("user-agent").is_some());
    }

    #[test]
    fn test_chat_headers_carry_the_token() {
        let headers = chat_headers("vqd-token-123").unwrap();
        assert_eq!(headers.get(TOKEN_HEADER).unwrap(), "vqd-token-123");
        assert_eq!(headers.get("accept").unwrap(), "text/event-stream");
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn test_chat_headers_reject_invalid_token_bytes() {
        assert!(chat_headers("line\nbreak").is_err());
    }

    #[test]
    fn test_seeded_jar_sets_cookies_for_origin() {
        use reqwest::cookie::CookieStore;

        let url = Url::parse("https://duckduckgo.com/").unwrap();
        let jar = seeded_cookie_jar(&url);
        let cookies = jar.cookies(&url).unwrap();
        let cookies = cookies.to_str().unwrap();
        assert!(cookies.contains("dcm=3"));
        assert!(cookies.contains("preferredDuckAiModel=3"));
    }
}
