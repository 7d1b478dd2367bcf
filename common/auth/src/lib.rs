pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod guards;
pub mod roles;
pub mod signer;
pub mod verifier;

pub use claims::Claims;
pub use config::{JwtConfig, MAX_TTL_SECONDS};
pub use error::{AuthError, AuthResult};
pub use extractors::AuthContext;
pub use guards::{ensure_admin, ensure_same_email, GuardError};
pub use roles::{is_admin, ROLE_ADMIN};
pub use signer::TokenSigner;
pub use verifier::JwtVerifier;
