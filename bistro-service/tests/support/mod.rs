#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bistro_service::metrics::BistroMetrics;
use bistro_service::{build_router, AppState, MemoryStore};
use common_auth::{JwtConfig, TokenSigner};
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use tower::util::ServiceExt;

pub const SECRET: &str = "integration-secret";
pub const ORIGIN: &str = "http://localhost:5173";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub signer: TokenSigner,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = JwtConfig::new(SECRET);
        let signer = TokenSigner::new(&config);
        let state = AppState::new(store.clone(), config, BistroMetrics::new().expect("metrics"));
        let router = build_router(state, ORIGIN).expect("router");
        Self { router, store, signer }
    }

    pub fn token_for(&self, email: &str) -> String {
        let mut claims = Map::new();
        claims.insert("email".into(), Value::from(email));
        self.signer.issue(claims).expect("token")
    }

    /// Seed an admin account and return a token for it.
    pub fn admin_token(&self, email: &str) -> String {
        self.store.seed_user(email, Some("admin")).expect("seed admin");
        self.token_for(email)
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }
}
