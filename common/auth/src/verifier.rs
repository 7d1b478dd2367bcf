use std::collections::HashSet;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use tracing::debug;

use crate::claims::{Claims, EXPIRES_AT};
use crate::config::JwtConfig;
use crate::error::AuthResult;

#[derive(Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret());
        Self {
            config,
            decoding_key,
        }
    }

    /// Check signature and expiry in a single pass and hand back the claims.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.config.leeway_seconds.into();
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::from([EXPIRES_AT.to_string()]);

        let token_data = decode::<Map<String, Value>>(token, &self.decoding_key, &validation)?;
        let claims = Claims::try_from(token_data.claims)?;
        debug!(email = claims.email.as_deref().unwrap_or("-"), "verified JWT successfully");
        Ok(claims)
    }
}
