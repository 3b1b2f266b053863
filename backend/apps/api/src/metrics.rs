//! Prometheus Metrics
//!
//! Auth outcome counters, fed through the auth observer hook, plus per-route
//! response durations and a 5xx counter fed by [`track_http`]. Auth events
//! are logged as well as counted.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use auth::observer::{AuthEvent, AuthObserver, TracingObserver};

#[derive(Clone)]
pub struct PrometheusObserver {
    registry: Registry,
    successes: IntCounterVec,
    failures: IntCounterVec,
    inactivations: IntCounterVec,
    client_generations: IntCounter,
    token_generations: IntCounter,
    http_errors: IntCounter,
    response_durations: HistogramVec,
}

impl PrometheusObserver {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let successes = IntCounterVec::new(
            Opts::new("auth_successes", "Successful authentications"),
            &["method"],
        )?;
        let failures = IntCounterVec::new(
            Opts::new("auth_failures", "Failed authentications"),
            &["method"],
        )?;
        let inactivations = IntCounterVec::new(
            Opts::new("auth_inactivations", "Credentials deliberately invalidated"),
            &["method"],
        )?;
        let client_generations = IntCounter::new(
            "oauth2_client_generations",
            "OAuth2 clients generated",
        )?;
        let token_generations =
            IntCounter::new("oauth2_token_generations", "OAuth2 tokens generated")?;
        let http_errors = IntCounter::new("http_errors", "5xx responses sent")?;
        let response_durations = HistogramVec::new(
            HistogramOpts::new(
                "http_response_duration_seconds",
                "HTTP response durations by route",
            ),
            &["route"],
        )?;

        registry.register(Box::new(successes.clone()))?;
        registry.register(Box::new(failures.clone()))?;
        registry.register(Box::new(inactivations.clone()))?;
        registry.register(Box::new(client_generations.clone()))?;
        registry.register(Box::new(token_generations.clone()))?;
        registry.register(Box::new(http_errors.clone()))?;
        registry.register(Box::new(response_durations.clone()))?;

        Ok(Self {
            registry,
            successes,
            failures,
            inactivations,
            client_generations,
            token_generations,
            http_errors,
            response_durations,
        })
    }

    fn observe_response(&self, route: &str, status: StatusCode, elapsed_secs: f64) {
        self.response_durations
            .with_label_values(&[route])
            .observe(elapsed_secs);
        if status.is_server_error() {
            self.http_errors.inc();
        }
    }

    /// Text exposition format
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl AuthObserver for PrometheusObserver {
    fn record(&self, event: AuthEvent) {
        TracingObserver.record(event);

        match event {
            AuthEvent::Success(method) => self.successes.with_label_values(&[method.as_str()]).inc(),
            AuthEvent::Failure(method) => self.failures.with_label_values(&[method.as_str()]).inc(),
            AuthEvent::Inactivation(method) => {
                self.inactivations.with_label_values(&[method.as_str()]).inc()
            }
            AuthEvent::ClientGeneration => self.client_generations.inc(),
            AuthEvent::TokenGeneration => self.token_generations.inc(),
        }
    }
}

/// Route-layer middleware timing every matched request
pub async fn track_http(
    State(metrics): State<PrometheusObserver>,
    req: Request,
    next: Next,
) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let started = Instant::now();
    let response = next.run(req).await;
    metrics.observe_response(&route, response.status(), started.elapsed().as_secs_f64());

    response
}

/// GET /metrics
pub async fn metrics_handler(State(metrics): State<PrometheusObserver>) -> Response {
    match metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::observer::AuthMethod;

    #[test]
    fn test_events_counted_by_method() {
        let metrics = PrometheusObserver::new().unwrap();
        metrics.record(AuthEvent::Success(AuthMethod::Web));
        metrics.record(AuthEvent::Success(AuthMethod::Web));
        metrics.record(AuthEvent::Failure(AuthMethod::OAuth2));
        metrics.record(AuthEvent::TokenGeneration);

        assert_eq!(metrics.successes.with_label_values(&["web"]).get(), 2);
        assert_eq!(metrics.failures.with_label_values(&["oauth2"]).get(), 1);
        assert_eq!(metrics.token_generations.get(), 1);

        let text = metrics.render().unwrap();
        assert!(text.contains("auth_successes{method=\"web\"} 2"));
        assert!(text.contains("oauth2_token_generations 1"));
    }

    #[tokio::test]
    async fn test_http_responses_timed_and_errors_counted() {
        use axum::body::Body;
        use axum::{Router, middleware::from_fn_with_state, routing::get};
        use tower::ServiceExt;

        let metrics = PrometheusObserver::new().unwrap();
        let app = Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route_layer(from_fn_with_state(metrics.clone(), track_http));

        for uri in ["/ok", "/ok", "/boom"] {
            let req = axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap();
            app.clone().oneshot(req).await.unwrap();
        }

        assert_eq!(metrics.http_errors.get(), 1);
        assert_eq!(
            metrics.response_durations.with_label_values(&["/ok"]).get_sample_count(),
            2
        );

        let text = metrics.render().unwrap();
        assert!(text.contains("http_errors 1"));
        assert!(text.contains("http_response_duration_seconds_count{route=\"/boom\"} 1"));
    }
}
