//! Authentication Outcome Observer
//!
//! Use cases report outcomes through [`AuthObserver`] instead of touching
//! global counters. The binary plugs in a Prometheus-backed implementation.

use std::fmt;
use std::sync::Arc;

/// How the caller tried to authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    /// Session cookie or password login
    Web,
    /// Bearer token
    OAuth2,
    /// OAuth2 credentials managed through a browser session
    OAuth2ViaWeb,
}

impl AuthMethod {
    /// Metric label value
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Web => "web",
            AuthMethod::OAuth2 => "oauth2",
            AuthMethod::OAuth2ViaWeb => "oauth2_via_web",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    Success(AuthMethod),
    Failure(AuthMethod),
    /// A credential was deliberately invalidated (logout, rotation)
    Inactivation(AuthMethod),
    ClientGeneration,
    TokenGeneration,
}

pub trait AuthObserver: Send + Sync {
    fn record(&self, event: AuthEvent);
}

/// Shared observer handle
pub type SharedObserver = Arc<dyn AuthObserver>;

/// Logs every event at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AuthObserver for TracingObserver {
    fn record(&self, event: AuthEvent) {
        match event {
            AuthEvent::Success(method) => tracing::debug!(%method, "auth success"),
            AuthEvent::Failure(method) => tracing::debug!(%method, "auth failure"),
            AuthEvent::Inactivation(method) => tracing::debug!(%method, "auth inactivation"),
            AuthEvent::ClientGeneration => tracing::debug!("oauth2 client generated"),
            AuthEvent::TokenGeneration => tracing::debug!("oauth2 token generated"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AuthObserver for NoopObserver {
    fn record(&self, _event: AuthEvent) {}
}

/// Observer that keeps every event, for assertions in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<AuthEvent>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub fn events(&self) -> Vec<AuthEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl AuthObserver for RecordingObserver {
    fn record(&self, event: AuthEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_labels() {
        assert_eq!(AuthMethod::Web.as_str(), "web");
        assert_eq!(AuthMethod::OAuth2.as_str(), "oauth2");
        assert_eq!(AuthMethod::OAuth2ViaWeb.to_string(), "oauth2_via_web");
    }

    #[test]
    fn test_recording_observer() {
        let observer = RecordingObserver::default();
        observer.record(AuthEvent::Success(AuthMethod::Web));
        observer.record(AuthEvent::ClientGeneration);
        assert_eq!(
            observer.events(),
            vec![AuthEvent::Success(AuthMethod::Web), AuthEvent::ClientGeneration]
        );
    }
}
