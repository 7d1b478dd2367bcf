use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use common_auth::AuthContext;
use common_http_errors::ApiError;
use serde::de::DeserializeOwned;

use crate::app_state::AppState;
use crate::trace::trace_id_for;

/// JSON body whose rejections (wrong content type, bad syntax, missing
/// fields) come back as `400 invalid_payload` with the request's trace id.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let trace_id = trace_id_for(&mut parts);
        let req = Request::from_parts(parts, body);
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::BadRequest {
                code: "invalid_payload",
                trace_id: Some(trace_id),
                message: Some(rejection.body_text()),
            }),
        }
    }
}

/// A verified caller. Same checks as [`AuthContext`], but a 401 carries the trace id.
#[derive(Debug, Clone)]
pub struct Caller(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let trace_id = trace_id_for(parts);
        AuthContext::from_request_parts(parts, state)
            .await
            .map(Caller)
            .map_err(|err| ApiError::from(err).with_trace(trace_id))
    }
}
