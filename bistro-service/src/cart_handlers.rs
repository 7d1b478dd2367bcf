use axum::{
    extract::{Path, State},
    Json,
};
use common_http_errors::ApiError;

use crate::app_state::AppState;
use crate::extract::ApiJson;
use crate::models::{CartItem, DocumentId, NewCartItem};
use crate::store::{DeleteOutcome, InsertOutcome};
use crate::trace::TraceId;

// Cart routes carry no auth; any caller can read or change any user's cart.

pub async fn create_cart_item(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    ApiJson(item): ApiJson<NewCartItem>,
) -> Result<Json<InsertOutcome>, ApiError> {
    item.validate().map_err(|message| ApiError::BadRequest {
        code: "invalid_cart_item",
        trace_id: Some(trace_id),
        message: Some(message),
    })?;
    let outcome = state
        .carts
        .insert_cart_item(item)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(outcome))
}

pub async fn list_cart_items(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    Path(user_email): Path<String>,
) -> Result<Json<Vec<CartItem>>, ApiError> {
    let items = state
        .carts
        .list_cart_items(&user_email)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(items))
}

pub async fn delete_cart_item(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = DocumentId::from_path(&id, trace_id)?;
    let outcome = state
        .carts
        .delete_cart_item(id)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(outcome))
}
