use axum::{extract::State, Json};
use common_http_errors::ApiError;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::app_state::AppState;
use crate::extract::ApiJson;
use crate::trace::TraceId;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Sign whatever object the caller presents. No credential check happens here;
/// the claims are trusted as given.
pub async fn issue_token(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
    ApiJson(claims): ApiJson<Map<String, Value>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .token_signer
        .issue(claims)
        .map_err(|err| ApiError::from(err).with_trace(trace_id))?;
    state.metrics.token_issued();
    Ok(Json(TokenResponse { token }))
}
