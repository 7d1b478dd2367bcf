use std::sync::Arc;

use axum::extract::FromRef;
use common_auth::{JwtConfig, JwtVerifier, TokenSigner};

use crate::metrics::BistroMetrics;
use crate::store::{CartStore, DocumentStore, MenuStore, ReviewStore, UserStore};

/// Shared application state. The store handles and signing material are
/// built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub menu: Arc<dyn MenuStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub carts: Arc<dyn CartStore>,
    pub token_signer: Arc<TokenSigner>,
    pub jwt_verifier: Arc<JwtVerifier>,
    pub metrics: Arc<BistroMetrics>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, jwt: JwtConfig, metrics: BistroMetrics) -> Self
    where
        S: DocumentStore + 'static,
    {
        Self {
            users: store.clone(),
            menu: store.clone(),
            reviews: store.clone(),
            carts: store,
            token_signer: Arc::new(TokenSigner::new(&jwt)),
            jwt_verifier: Arc::new(JwtVerifier::new(jwt)),
            metrics: Arc::new(metrics),
        }
    }
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_verifier.clone()
    }
}
