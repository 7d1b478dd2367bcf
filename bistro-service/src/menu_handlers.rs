use axum::{
    extract::{Path, State},
    Json,
};
use common_http_errors::ApiError;
use uuid::Uuid;

use crate::admin_guard::AdminContext;
use crate::app_state::AppState;
use crate::extract::ApiJson;
use crate::models::{DocumentId, MenuItem, MenuItemInput};
use crate::store::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::trace::TraceId;

fn validated(input: MenuItemInput, trace_id: Uuid) -> Result<MenuItemInput, ApiError> {
    input.validate().map_err(|message| ApiError::BadRequest {
        code: "invalid_menu_item",
        trace_id: Some(trace_id),
        message: Some(message),
    })?;
    Ok(input)
}

pub async fn list_menu(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let items = state
        .menu
        .list_menu()
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(items))
}

/// An unknown id answers `null`, matching the store's find-one result.
pub async fn get_menu_item(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    Path(id): Path<String>,
) -> Result<Json<Option<MenuItem>>, ApiError> {
    let id = DocumentId::from_path(&id, trace_id)?;
    let item = state
        .menu
        .find_menu_item(id)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(item))
}

// Publicly writable: this route has no token or role check.
pub async fn update_menu_item(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<MenuItemInput>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id = DocumentId::from_path(&id, trace_id)?;
    let input = validated(input, trace_id)?;
    let outcome = state
        .menu
        .update_menu_item(id, input)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(outcome))
}

pub async fn create_menu_item(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    _admin: AdminContext,
    ApiJson(input): ApiJson<MenuItemInput>,
) -> Result<Json<InsertOutcome>, ApiError> {
    let input = validated(input, trace_id)?;
    let outcome = state
        .menu
        .insert_menu_item(input)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(outcome))
}

pub async fn delete_menu_item(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    _admin: AdminContext,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = DocumentId::from_path(&id, trace_id)?;
    let outcome = state
        .menu
        .delete_menu_item(id)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(outcome))
}
