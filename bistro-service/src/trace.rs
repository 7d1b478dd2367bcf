use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};
use uuid::Uuid;

pub const TRACE_HEADER: &str = "X-Trace-ID";

/// Per-request correlation id: the caller's `X-Trace-ID` when it parses, a fresh one otherwise.
#[derive(Debug, Clone, Copy)]
pub struct TraceId(pub Uuid);

fn trace_id_from_headers(headers: &HeaderMap) -> Uuid {
    headers
        .get(TRACE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .unwrap_or_else(Uuid::new_v4)
}

/// Trace id for this request, cached in the extensions so every extractor agrees.
pub fn trace_id_for(parts: &mut Parts) -> Uuid {
    if let Some(TraceId(existing)) = parts.extensions.get::<TraceId>() {
        return *existing;
    }
    let trace = trace_id_from_headers(&parts.headers);
    parts.extensions.insert(TraceId(trace));
    trace
}

#[async_trait]
impl<S> FromRequestParts<S> for TraceId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(TraceId(trace_id_for(parts)))
    }
}
