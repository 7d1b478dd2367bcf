use axum::{
    extract::{Path, State},
    Json,
};
use common_auth::{ensure_same_email, is_admin, ROLE_ADMIN};
use common_http_errors::ApiError;
use serde::Serialize;
use tracing::info;

use crate::admin_guard::AdminContext;
use crate::app_state::AppState;
use crate::extract::{ApiJson, Caller};
use crate::models::{DocumentId, NewUser, User};
use crate::store::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::trace::TraceId;

pub const USER_EXISTS_MESSAGE: &str = "user already exists";

#[derive(Debug, Serialize)]
pub struct UserExists {
    pub message: &'static str,
    #[serde(rename = "insertedId")]
    pub inserted_id: Option<DocumentId>,
}

/// Duplicate registrations are answered with 200 and a null id, never an error status.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
    Created(InsertOutcome),
    Exists(UserExists),
}

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub admin: bool,
}

pub async fn create_user(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    _caller: Caller,
    ApiJson(new_user): ApiJson<NewUser>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    new_user.validate().map_err(|message| ApiError::BadRequest {
        code: "invalid_user",
        trace_id: Some(trace_id),
        message: Some(message),
    })?;

    // Check-then-insert: two concurrent registrations for one email can both pass.
    let existing = state
        .users
        .find_user_by_email(&new_user.email)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    if existing.is_some() {
        return Ok(Json(CreateUserResponse::Exists(UserExists {
            message: USER_EXISTS_MESSAGE,
            inserted_id: None,
        })));
    }

    let outcome = state
        .users
        .insert_user(new_user)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(CreateUserResponse::Created(outcome)))
}

pub async fn list_users(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    _admin: AdminContext,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .users
        .list_users()
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(users))
}

pub async fn admin_status(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    Caller(auth): Caller,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, ApiError> {
    ensure_same_email(&auth, &email).map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    let user = state
        .users
        .find_user_by_email(&email)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    let admin = is_admin(user.as_ref().and_then(|u| u.role.as_deref()));
    Ok(Json(AdminStatus { admin }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    admin: AdminContext,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = DocumentId::from_path(&id, trace_id)?;
    let outcome = state
        .users
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    info!(%trace_id, %id, by = %admin.user.email, deleted = outcome.deleted_count, "user_deleted");
    Ok(Json(outcome))
}

pub async fn make_admin(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    admin: AdminContext,
    Path(id): Path<String>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id = DocumentId::from_path(&id, trace_id)?;
    let outcome = state
        .users
        .set_user_role(id, ROLE_ADMIN)
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    info!(%trace_id, %id, by = %admin.user.email, matched = outcome.matched_count, "user_promoted");
    Ok(Json(outcome))
}
