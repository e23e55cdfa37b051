//! Prometheus metrics for the recipe API
//!
//! Every request is counted by route, status code and method, timed
//! into a latency histogram, and tracked in an in-flight gauge while
//! it runs. The registry is owned by the router so independent
//! routers never share counters.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    TEXT_FORMAT,
};

use crate::core::error::RecipeError;

pub const IN_FLIGHT: &str = "http_server_requests_in_flight";
pub const REQUESTS_TOTAL: &str = "http_server_requests_total";
pub const REQUEST_DURATION: &str = "http_server_request_duration_seconds";

/// Route label for requests that matched no route
const UNMATCHED_ROUTE: &str = "unmatched";

impl From<prometheus::Error> for RecipeError {
    fn from(e: prometheus::Error) -> Self {
        RecipeError::MetricsError(e.to_string())
    }
}

/// HTTP server metrics and the registry they are exported from
pub struct HttpMetrics {
    registry: Registry,
    in_flight: IntGauge,
    requests: IntCounterVec,
    duration: HistogramVec,
}

impl HttpMetrics {
    pub fn new() -> Result<Self, RecipeError> {
        let registry = Registry::new();

        let in_flight = IntGauge::with_opts(Opts::new(
            IN_FLIGHT,
            "Number of requests currently being served",
        ))?;
        let requests = IntCounterVec::new(
            Opts::new(REQUESTS_TOTAL, "Requests served, by route, status code and method"),
            &["uri", "code", "method"],
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new(REQUEST_DURATION, "Request latency in seconds"),
            &["uri", "method"],
        )?;

        registry.register(Box::new(in_flight.clone()))?;
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry,
            in_flight,
            requests,
            duration,
        })
    }

    /// Render every registered metric in the text exposition format
    pub fn render(&self) -> Result<String, RecipeError> {
        let encoder = TextEncoder::new();
        Ok(encoder.encode_to_string(&self.registry.gather())?)
    }

    fn observe(&self, uri: &str, method: &str, status: StatusCode, seconds: f64) {
        self.requests
            .with_label_values(&[uri, status.as_str(), method])
            .inc();
        self.duration
            .with_label_values(&[uri, method])
            .observe(seconds);
    }
}

/// Decrements the in-flight gauge when the request ends, even if the
/// response future is dropped early
struct InFlightGuard(IntGauge);

impl InFlightGuard {
    fn enter(gauge: &IntGauge) -> Self {
        gauge.inc();
        Self(gauge.clone())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.dec();
    }
}

/// Metrics middleware
///
/// Labels use the matched route template (`/api/recipes/:id`) rather
/// than the raw path so recipe ids never become label values.
pub async fn track_metrics(
    State(metrics): State<Arc<HttpMetrics>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let _in_flight = InFlightGuard::enter(&metrics.in_flight);
    let start = Instant::now();

    let method = request.method().to_string();
    let uri = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let response = next.run(request).await;

    metrics.observe(
        &uri,
        &method,
        response.status(),
        start.elapsed().as_secs_f64(),
    );
    response
}

/// Prometheus scrape endpoint
pub async fn metrics_handler(State(metrics): State<Arc<HttpMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            e.into_response()
        }
    }
}
