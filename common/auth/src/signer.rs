use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{Map, Value};

use crate::claims::{EXPIRES_AT, ISSUED_AT};
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// Issues HS256 tokens over arbitrary claim objects.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    ttl_seconds: i64,
}

impl TokenSigner {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            ttl_seconds: config.ttl_seconds,
        }
    }

    pub fn issue(&self, claims: Map<String, Value>) -> AuthResult<String> {
        self.issue_at(claims, Utc::now())
    }

    /// Sign `claims` as if issued at `issued_at`. Caller-provided `iat`/`exp`
    /// are overwritten.
    pub fn issue_at(&self, mut claims: Map<String, Value>, issued_at: DateTime<Utc>) -> AuthResult<String> {
        let expires_at = Duration::try_seconds(self.ttl_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::Signing(format!("token lifetime of {}s is out of range", self.ttl_seconds)))?;
        claims.insert(ISSUED_AT.into(), Value::from(issued_at.timestamp()));
        claims.insert(EXPIRES_AT.into(), Value::from(expires_at.timestamp()));
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }
}
