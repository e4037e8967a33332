//! Request handling.
//!
//! # Responsibilities
//! - Attach a unique request ID (UUID v4) unless the proxy already set one
//! - Echo the ID on the response for correlation with logs
//! - Read proxy-asserted header values

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Middleware assigning and propagating `x-request-id`.
pub async fn propagate_request_id(mut request: Request<Body>, next: Next) -> Response {
    let id = match request.headers().get(X_REQUEST_ID) {
        Some(existing) => existing.clone(),
        None => {
            let generated = Uuid::new_v4().to_string();
            // A UUID is always a valid header value.
            match HeaderValue::from_str(&generated) {
                Ok(value) => {
                    request.headers_mut().insert(X_REQUEST_ID, value.clone());
                    value
                }
                Err(_) => return next.run(request).await,
            }
        }
    };

    let text = String::from_utf8_lossy(id.as_bytes()).into_owned();
    request.extensions_mut().insert(RequestId(text));

    let mut response = next.run(request).await;
    response.headers_mut().insert(X_REQUEST_ID, id);
    response
}

/// Value of a header as text. Invalid UTF-8 is replaced, not rejected.
pub fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// Client address from a forwarding header: first comma-separated entry.
pub fn forwarded_client(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    let raw = header_text(headers, name)?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// All request headers as text pairs, in arrival order.
pub fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_text_lossy() {
        let name = HeaderName::from_static("ssl_client_subject");
        let mut headers = HeaderMap::new();
        headers.insert(
            name.clone(),
            HeaderValue::from_bytes(b"/CN=Jos\xe9").unwrap(),
        );

        let text = header_text(&headers, &name).unwrap();
        assert!(text.starts_with("/CN=Jos"));
        assert!(text.ends_with('\u{FFFD}'));
    }

    #[test]
    fn test_forwarded_client_first_entry() {
        let name = HeaderName::from_static("x-forwarded-for");
        let mut headers = HeaderMap::new();
        assert_eq!(forwarded_client(&headers, &name), None);

        headers.insert(name.clone(), HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"));
        assert_eq!(forwarded_client(&headers, &name).as_deref(), Some("203.0.113.7"));

        headers.insert(name.clone(), HeaderValue::from_static(" "));
        assert_eq!(forwarded_client(&headers, &name), None);
    }
}
