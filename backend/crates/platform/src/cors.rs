//! CORS Allow Headers
//!
//! Browser callers on `http://localhost:<port>` (development) or any
//! `https://` origin get credentialed CORS headers echoed back. Other origins
//! get nothing and the browser enforces same-origin.

use axum::http::{HeaderMap, HeaderValue, header};

pub const ALLOW_METHODS: &str = "PATCH,DELETE";
pub const ALLOW_HEADERS: &str = "Cookie,X-User-Id,X-Request-Id,Content-Type";

/// Whether `origin` may receive credentialed CORS headers
pub fn is_allowed_origin(origin: &str) -> bool {
    origin.starts_with("http://localhost:") || origin.starts_with("https://")
}

/// Append the allow headers for `origin` when it qualifies
///
/// Returns `true` if headers were written.
pub fn apply_access_control(headers: &mut HeaderMap, origin: &str) -> bool {
    if !is_allowed_origin(origin) {
        return false;
    }
    let Ok(origin_value) = HeaderValue::from_str(origin) else {
        return false;
    };

    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins() {
        assert!(is_allowed_origin("http://localhost:3000"));
        assert!(is_allowed_origin("https://app.example.com"));
        assert!(!is_allowed_origin("http://example.com"));
        assert!(!is_allowed_origin("http://localhost"));
        assert!(!is_allowed_origin(""));
    }

    #[test]
    fn test_apply_access_control() {
        let mut headers = HeaderMap::new();
        assert!(apply_access_control(&mut headers, "https://app.example.com"));
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.example.com"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[test]
    fn test_disallowed_origin_writes_nothing() {
        let mut headers = HeaderMap::new();
        assert!(!apply_access_control(&mut headers, "http://evil.test"));
        assert!(headers.is_empty());
    }
}
