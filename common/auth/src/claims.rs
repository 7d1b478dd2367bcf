use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AuthError, AuthResult};

/// Registered claims the signer adds on top of the caller's payload.
pub(crate) const ISSUED_AT: &str = "iat";
pub(crate) const EXPIRES_AT: &str = "exp";

/// Verified token claims. The payload is whatever object was presented to
/// `POST /jwt`; by convention it carries the caller's `email`.
#[derive(Debug, Clone, Serialize)]
pub struct Claims {
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
    payload: Map<String, Value>,
}

impl Claims {
    /// The caller-supplied claims, without the signer's `iat`/`exp`.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

fn timestamp(name: &'static str, value: &Value) -> AuthResult<DateTime<Utc>> {
    value
        .as_i64()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or_else(|| AuthError::InvalidClaim(name, value.to_string()))
}

impl TryFrom<Map<String, Value>> for Claims {
    type Error = AuthError;

    fn try_from(mut payload: Map<String, Value>) -> AuthResult<Self> {
        let expires_at = match payload.remove(EXPIRES_AT) {
            Some(exp) => timestamp(EXPIRES_AT, &exp)?,
            None => return Err(AuthError::InvalidClaim(EXPIRES_AT, "missing".into())),
        };
        let issued_at = payload
            .remove(ISSUED_AT)
            .map(|iat| timestamp(ISSUED_AT, &iat))
            .transpose()?;
        let email = payload
            .get("email")
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(Self {
            email,
            expires_at,
            issued_at,
            payload,
        })
    }
}
