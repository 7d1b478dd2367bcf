use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use crate::ERROR_CODE_HEADER;

/// Upper bound on distinct `code` label values; later codes are folded into `other`.
pub const MAX_ERROR_CODES: usize = 40;

const OVERFLOW_LABEL: &str = "other";

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

static HTTP_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    let v = IntCounterVec::new(
        Opts::new("http_errors_total", "Count of HTTP error responses emitted (status >= 400)"),
        &["service", "code", "status"],
    ).expect("valid http_errors_total opts");
    REGISTRY.register(Box::new(v.clone())).ok();
    v
});

static CODE_OVERFLOW: Lazy<IntCounter> = Lazy::new(|| {
    let c = IntCounter::new("http_error_code_overflow_total", "Error responses whose code exceeded the label guard")
        .expect("valid overflow opts");
    REGISTRY.register(Box::new(c.clone())).ok();
    c
});

static SEEN_CODES: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

pub fn metrics_registry() -> &'static Registry {
    Lazy::force(&HTTP_ERRORS);
    Lazy::force(&CODE_OVERFLOW);
    &REGISTRY
}

fn guarded_label(code: &str) -> String {
    let mut seen = match SEEN_CODES.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if seen.contains(code) {
        return code.to_string();
    }
    if seen.len() < MAX_ERROR_CODES {
        seen.insert(code.to_string());
        return code.to_string();
    }
    CODE_OVERFLOW.inc();
    OVERFLOW_LABEL.to_string()
}

fn record(service: &str, resp: &Response) {
    let status = resp.status();
    if status.as_u16() < 400 {
        return;
    }
    let code = resp
        .headers()
        .get(ERROR_CODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unlabelled");
    let label = guarded_label(code);
    HTTP_ERRORS
        .with_label_values(&[service, label.as_str(), status.as_str()])
        .inc();
}

type LayerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Middleware for `axum::middleware::from_fn` counting every error response by code.
pub fn http_error_metrics_layer(
    service: &'static str,
) -> impl Fn(Request, Next) -> LayerFuture + Clone + Send + Sync + 'static {
    move |req: Request, next: Next| -> LayerFuture {
        Box::pin(async move {
            let resp = next.run(req).await;
            record(service, &resp);
            resp
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_guard_folds_codes_past_limit() {
        for i in 0..MAX_ERROR_CODES + 5 {
            guarded_label(&format!("guard_code_{i}"));
        }
        assert_eq!(guarded_label("guard_code_never_seen"), OVERFLOW_LABEL);
        assert!(CODE_OVERFLOW.get() > 0);
    }
}
