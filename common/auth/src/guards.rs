use axum::response::{IntoResponse, Response};
use common_http_errors::ApiError;

use crate::roles::{is_admin, ROLE_ADMIN};
use crate::AuthContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The looked-up account is missing or its role is not exactly `admin`.
    NotAdmin,
    /// The path names a different account than the token's `email` claim.
    IdentityMismatch,
}

impl From<GuardError> for ApiError {
    fn from(value: GuardError) -> Self {
        match value {
            GuardError::NotAdmin => ApiError::ForbiddenMissingRole { role: ROLE_ADMIN, trace_id: None },
            GuardError::IdentityMismatch => ApiError::Forbidden { trace_id: None },
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// `role` is the stored role of the account the token's email resolves to;
/// `None` covers both "no such account" and "account without a role".
pub fn ensure_admin(role: Option<&str>) -> Result<(), GuardError> {
    if is_admin(role) {
        Ok(())
    } else {
        Err(GuardError::NotAdmin)
    }
}

pub fn ensure_same_email(auth: &AuthContext, email: &str) -> Result<(), GuardError> {
    match auth.email() {
        Some(claimed) if claimed == email => Ok(()),
        _ => Err(GuardError::IdentityMismatch),
    }
}
