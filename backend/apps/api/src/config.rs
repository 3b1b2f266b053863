//! Server Configuration
//!
//! Read once at startup from the process environment (after `.env`).

use std::net::SocketAddr;

use anyhow::Context;
use auth::AuthConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite://auth.db?mode=rwc";
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8081";
const DEFAULT_DOMAIN: &str = "localhost";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub http_addr: SocketAddr,
    pub domain: String,
    /// Served behind TLS; drives the `Secure` cookie attribute
    pub tls_transport: bool,
    pub log_format: LogFormat,
    pub db_max_connections: u32,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let http_addr = var("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = http_addr
            .parse()
            .with_context(|| format!("invalid HTTP_ADDR: {http_addr}"))?;

        let db_max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid DB_MAX_CONNECTIONS: {raw}"))?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let tls_transport = var("TLS_TRANSPORT")
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        let log_format = match var("LOG_FORMAT") {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            http_addr,
            domain: var("DOMAIN").unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            tls_transport,
            log_format,
            db_max_connections,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::for_domain(self.domain.clone(), self.tls_transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.http_addr.port(), 8081);
        assert_eq!(config.domain, "localhost");
        assert!(!config.tls_transport);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.db_max_connections, 5);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DOMAIN", "auth.example.com"),
            ("TLS_TRANSPORT", "TRUE"),
            ("LOG_FORMAT", "json"),
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("DB_MAX_CONNECTIONS", "10"),
        ])
        .unwrap();

        assert!(config.tls_transport);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.db_max_connections, 10);

        let auth = config.auth_config();
        assert_eq!(auth.cookie_domain, "auth.example.com");
        assert!(auth.session_cookie().secure);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config(&[("HTTP_ADDR", "not an address")]).is_err());
        assert!(config(&[("DB_MAX_CONNECTIONS", "many")]).is_err());
    }
}
