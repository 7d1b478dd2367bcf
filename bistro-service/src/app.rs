use anyhow::{Context, Result};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use common_http_errors::http_error_metrics_layer;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::app_state::AppState;
use crate::cart_handlers::{create_cart_item, delete_cart_item, list_cart_items};
use crate::menu_handlers::{
    create_menu_item, delete_menu_item, get_menu_item, list_menu, update_menu_item,
};
use crate::metrics::{metrics_endpoint, track_requests};
use crate::review_handlers::list_reviews;
use crate::token_handlers::issue_token;
use crate::user_handlers::{admin_status, create_user, delete_user, list_users, make_admin};

pub const SERVICE_NAME: &str = "bistro-service";
pub const LIVENESS_MESSAGE: &str = "bistro boss restaurant server is cooking";

async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

async fn health() -> &'static str {
    "ok"
}

/// Exactly one origin, with credentials. Other origins get no CORS headers.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("Invalid CORS origin '{origin}'"))?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE]))
}

/// `/users/admin/:key` and `/carts/:key` each serve two handlers whose
/// parameter means different things (email vs id), so they share one template.
pub fn build_router(state: AppState, cors_origin: &str) -> Result<Router> {
    let router = Router::new()
        .route("/", get(root))
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/jwt", post(issue_token))
        .route("/users", post(create_user).get(list_users))
        .route("/users/admin/:key", get(admin_status).patch(make_admin))
        .route("/users/:id", delete(delete_user))
        .route("/menu", get(list_menu).post(create_menu_item))
        .route(
            "/menu/:id",
            get(get_menu_item)
                .patch(update_menu_item)
                .delete(delete_menu_item),
        )
        .route("/review", get(list_reviews))
        .route("/carts", post(create_cart_item))
        .route("/carts/:key", get(list_cart_items).delete(delete_cart_item))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(middleware::from_fn(http_error_metrics_layer(SERVICE_NAME)))
        .layer(cors_layer(cors_origin)?)
        .with_state(state);
    Ok(router)
}
