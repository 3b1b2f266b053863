//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Name of the browser session cookie
pub const SESSION_COOKIE_NAME: &str = "auth_session";

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Cookie `Domain` and the domain stamped onto sessions
    pub cookie_domain: String,
    /// Served over TLS; drives the cookie `Secure` flag
    pub tls_transport: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Session lifetime (30 days)
    pub session_ttl: Duration,
    /// Lifetime of access tokens from the client-credentials grant
    pub access_token_ttl: Duration,
    /// Domain recorded on newly generated OAuth2 clients
    pub client_domain: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: SESSION_COOKIE_NAME.to_string(),
            cookie_domain: "localhost".to_string(),
            tls_transport: true,
            cookie_same_site: SameSite::Lax,
            session_ttl: Duration::from_secs(30 * 24 * 3600), // 30 days
            access_token_ttl: Duration::from_secs(2 * 3600),  // 2 hours
            client_domain: "localhost".to_string(),
        }
    }
}

impl AuthConfig {
    /// Config for a given public domain
    pub fn for_domain(domain: impl Into<String>, tls_transport: bool) -> Self {
        let domain = domain.into();
        Self {
            cookie_domain: domain.clone(),
            client_domain: domain,
            tls_transport,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            tls_transport: false,
            ..Default::default()
        }
    }

    /// Session TTL as a chrono duration
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::days(30))
    }

    /// Cookie attributes for the session cookie
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            domain: Some(self.cookie_domain.clone()),
            secure: self.tls_transport,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_follows_tls_flag() {
        let secure = AuthConfig::for_domain("example.com", true).session_cookie();
        assert!(secure.secure);
        assert!(secure.http_only);
        assert_eq!(secure.domain.as_deref(), Some("example.com"));
        assert_eq!(secure.max_age_secs, Some(30 * 24 * 3600));

        let dev = AuthConfig::development().session_cookie();
        assert!(!dev.secure);
        assert_eq!(dev.name, SESSION_COOKIE_NAME);
    }
}
