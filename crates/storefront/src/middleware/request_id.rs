//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an `x-request-id` from an upstream proxy when it looks sane,
//! otherwise generates a UUID v4. The ID is recorded on the request span,
//! tagged on the Sentry scope and echoed in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(accept_upstream_id)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Upstream IDs must be short, non-empty and limited to `[A-Za-z0-9._-]`.
fn accept_upstream_id(value: &str) -> Option<&str> {
    let value = value.trim();
    let valid = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    valid.then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_proxy_ids() {
        assert_eq!(accept_upstream_id("abc-123"), Some("abc-123"));
        assert_eq!(
            accept_upstream_id(" 8f14e45f-ceea-467f-a0e6-3d5d2c1b0a9e "),
            Some("8f14e45f-ceea-467f-a0e6-3d5d2c1b0a9e")
        );
    }

    #[test]
    fn test_rejects_suspicious_ids() {
        assert_eq!(accept_upstream_id(""), None);
        assert_eq!(accept_upstream_id("a b"), None);
        assert_eq!(accept_upstream_id("<script>"), None);
        assert_eq!(accept_upstream_id(&"x".repeat(MAX_REQUEST_ID_LEN + 1)), None);
    }
}
