use axum::{extract::State, Json};
use common_http_errors::ApiError;

use crate::app_state::AppState;
use crate::models::Review;
use crate::trace::TraceId;

pub async fn list_reviews(
    State(state): State<AppState>,
    TraceId(trace_id): TraceId,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state
        .reviews
        .list_reviews()
        .await
        .map_err(|e| ApiError::from(e).with_trace(trace_id))?;
    Ok(Json(reviews))
}
