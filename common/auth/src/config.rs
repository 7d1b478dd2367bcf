use std::fmt;

/// Longest token lifetime a deployment may configure: one year.
pub const MAX_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Runtime configuration shared by the token signer and verifier.
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 shared secret.
    secret: Vec<u8>,
    /// Lifetime of issued tokens in seconds.
    pub ttl_seconds: i64,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
}

impl JwtConfig {
    /// One hour lifetime, no leeway.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: 3600,
            leeway_seconds: 0,
        }
    }

    pub fn with_ttl(mut self, seconds: i64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}
