use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common_auth::{ensure_admin, AuthContext, GuardError};
use common_http_errors::ApiError;
use tracing::warn;

use crate::app_state::AppState;
use crate::extract::Caller;
use crate::models::User;
use crate::trace::trace_id_for;

/// Token verification followed by the admin role lookup. Each extraction
/// re-reads the caller's user record; nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub auth: AuthContext,
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Caller(auth) = Caller::from_request_parts(parts, state).await?;
        let trace_id = trace_id_for(parts);

        let user = match auth.email() {
            Some(email) => state
                .users
                .find_user_by_email(email)
                .await
                .map_err(|err| ApiError::from(err).with_trace(trace_id))?,
            None => None,
        };

        let denial = match user {
            Some(user) => match ensure_admin(user.role.as_deref()) {
                Ok(()) => return Ok(AdminContext { auth, user }),
                Err(err) => {
                    warn!(%trace_id, email = %user.email, role = ?user.role, "admin_check_failed");
                    err
                }
            },
            None => {
                warn!(%trace_id, email = auth.email().unwrap_or("-"), "admin_check_failed: no user record");
                GuardError::NotAdmin
            }
        };
        state.metrics.admin_denied();
        Err(ApiError::from(denial).with_trace(trace_id))
    }
}
