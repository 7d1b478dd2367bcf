use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use uuid::Uuid;

mod metrics;

pub use metrics::{http_error_metrics_layer, metrics_registry, MAX_ERROR_CODES};

pub const ERROR_CODE_HEADER: &str = "X-Error-Code";

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")] pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")] pub missing_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")] pub trace_id: Option<Uuid>,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized { trace_id: Option<Uuid> },
    ForbiddenMissingRole { role: &'static str, trace_id: Option<Uuid> },
    Forbidden { trace_id: Option<Uuid> },
    BadRequest { code: &'static str, trace_id: Option<Uuid>, message: Option<String> },
    Internal { trace_id: Option<Uuid>, message: Option<String> },
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E, trace_id: Option<Uuid>) -> Self { Self::Internal { trace_id, message: Some(e.to_string()) } }

    /// Attach a trace id when the error was raised without one.
    pub fn with_trace(mut self, trace: Uuid) -> Self {
        let slot = match &mut self {
            ApiError::Unauthorized { trace_id }
            | ApiError::ForbiddenMissingRole { trace_id, .. }
            | ApiError::Forbidden { trace_id }
            | ApiError::BadRequest { trace_id, .. }
            | ApiError::Internal { trace_id, .. } => trace_id,
        };
        slot.get_or_insert(trace);
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::ForbiddenMissingRole { .. } | ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Unauthorized { trace_id } =>
                ErrorBody { code: "unauthorized".into(), message: Some("unauthorized access".into()), missing_role: None, trace_id },
            ApiError::ForbiddenMissingRole { role, trace_id } =>
                ErrorBody { code: "missing_role".into(), message: Some("forbidden access".into()), missing_role: Some(role.into()), trace_id },
            ApiError::Forbidden { trace_id } =>
                ErrorBody { code: "forbidden".into(), message: Some("forbidden access".into()), missing_role: None, trace_id },
            ApiError::BadRequest { code, trace_id, message } =>
                ErrorBody { code: code.into(), message, missing_role: None, trace_id },
            ApiError::Internal { trace_id, message } => {
                // Driver messages stay in the logs; clients only see the trace id.
                tracing::error!(?trace_id, error = message.as_deref().unwrap_or("unknown"), "internal error");
                ErrorBody { code: "internal_error".into(), message: None, missing_role: None, trace_id }
            }
        };
        let code = body.code.clone();
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(&code) {
            resp.headers_mut().insert(ERROR_CODE_HEADER, val);
        }
        resp
    }
}
