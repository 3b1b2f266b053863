//! Request Context Extraction
//!
//! Turns raw request headers into the [`RequestContext`] the checker works on.

use axum::http::{HeaderMap, header};

use crate::application::check_request::RequestContext;

/// Method of the client request the proxy is asking about
pub const X_FORWARDED_METHOD: &str = "x-forwarded-method";

/// Identity header published on successful checks
pub const X_USER_ID: &str = "x-user-id";

pub fn request_context(headers: &HeaderMap, cookie_name: &str) -> RequestContext {
    RequestContext {
        session_cookie: platform::cookie::extract_cookie(headers, cookie_name),
        bearer_token: bearer_token(headers),
        forwarded_method: header_str(headers, X_FORWARDED_METHOD),
        origin: header_str(headers, header::ORIGIN.as_str()),
    }
}

/// `Authorization: Bearer <token>`, scheme matched case-insensitively
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc123"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_request_context_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_session=s1; other=x"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t1"));
        headers.insert(X_FORWARDED_METHOD, HeaderValue::from_static("options"));
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://app.example.com"));

        let ctx = request_context(&headers, "auth_session");
        assert_eq!(ctx.session_cookie.as_deref(), Some("s1"));
        assert_eq!(ctx.bearer_token.as_deref(), Some("t1"));
        assert_eq!(ctx.origin.as_deref(), Some("https://app.example.com"));
        assert!(ctx.is_forwarded_preflight());
    }
}
