// src/logging_middleware.rs
//! Middleware for logging JSON request and response bodies in debug mode
//!
//! Only `application/json` bodies are buffered. CV uploads and downloads
//! stream through untouched and are never written to the log.

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, Level};

/// Same ceiling axum applies to `Json` bodies by default.
const MAX_LOGGED_BODY: usize = 2 * 1024 * 1024;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

fn render_body(bytes: &[u8]) -> Option<String> {
    let body_str = std::str::from_utf8(bytes).ok()?;
    let rendered = serde_json::from_str::<serde_json::Value>(body_str)
        .ok()
        .map(|json| mask_secrets(json).to_string())
        .unwrap_or_else(|| body_str.to_string());
    Some(rendered)
}

/// Blanks password and token values before a body reaches the log.
fn mask_secrets(mut value: serde_json::Value) -> serde_json::Value {
    if let Some(map) = value.as_object_mut() {
        for key in ["password", "token"] {
            if let Some(field) = map.get_mut(key) {
                *field = serde_json::Value::from("***");
            }
        }
    }
    value
}

/// Middleware to log JSON request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !tracing::enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let request = if is_json(request.headers()) {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, MAX_LOGGED_BODY)
            .await
            .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

        if let Some(rendered) = render_body(&bytes).filter(|r| !r.is_empty()) {
            debug!(
                method = %parts.method,
                uri = %parts.uri,
                request_body = %rendered,
                "Request"
            );
        }

        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let response = next.run(request).await;

    if !is_json(response.headers()) {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(rendered) = render_body(&bytes) {
        debug!(
            status = %parts.status,
            response_body = %rendered,
            "Response"
        );
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_are_masked() {
        let rendered = render_body(br#"{"email":"a@b.co","password":"hunter2"}"#).unwrap();
        assert!(rendered.contains("\"password\":\"***\""));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_non_json_body_rendered_verbatim() {
        assert_eq!(render_body(b"plain").as_deref(), Some("plain"));
        assert_eq!(render_body(&[0xff, 0xfe]), None);
    }
}
