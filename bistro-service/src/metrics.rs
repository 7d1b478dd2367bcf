use anyhow::Result;
use axum::body::Body;
use axum::extract::{MatchedPath, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::app_state::AppState;

#[derive(Clone)]
pub struct BistroMetrics {
    registry: Registry,
    http_requests: IntCounterVec,
    tokens_issued: IntCounter,
    admin_denials: IntCounter,
}

impl BistroMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new(
                "bistro_http_requests_total",
                "Count of HTTP requests grouped by method, route and status",
            ),
            &["method", "route", "status"],
        )?;
        registry.register(Box::new(http_requests.clone()))?;

        let tokens_issued = IntCounter::new("bistro_tokens_issued_total", "Access tokens issued")?;
        registry.register(Box::new(tokens_issued.clone()))?;

        let admin_denials = IntCounter::new(
            "bistro_admin_denials_total",
            "Requests rejected by the admin role check",
        )?;
        registry.register(Box::new(admin_denials.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            tokens_issued,
            admin_denials,
        })
    }

    pub fn request(&self, method: &str, route: &str, status: StatusCode) {
        self.http_requests
            .with_label_values(&[method, route, status.as_str()])
            .inc();
    }

    pub fn token_issued(&self) {
        self.tokens_issued.inc();
    }

    pub fn admin_denied(&self) {
        self.admin_denials.inc();
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let mut metric_families = self.registry.gather();
        metric_families.extend(common_http_errors::metrics_registry().gather());
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}

/// Counts every request against its route template, so path ids never become labels.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());
    let resp = next.run(req).await;
    state.metrics.request(&method, &route, resp.status());
    resp
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(resp) => resp,
        Err(err) => {
            tracing::warn!(error = %err, "Unable to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
