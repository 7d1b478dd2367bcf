use std::net::SocketAddr;
use std::sync::Arc;

use bistro_service::config::{load_service_config, StoreBackend};
use bistro_service::metrics::BistroMetrics;
use bistro_service::{build_router, AppState, MemoryStore, MongoStore};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_service_config()?;
    let metrics = BistroMetrics::new()?;

    let state = match &config.store {
        StoreBackend::Mongo { uri, database } => {
            let store = MongoStore::connect(uri, database).await?;
            store.ping().await?;
            info!(database = %database, "Pinged deployment; connected to MongoDB");
            AppState::new(Arc::new(store), config.jwt.clone(), metrics)
        }
        StoreBackend::Memory => {
            warn!("STORE_BACKEND=memory: data lives only as long as this process");
            AppState::new(Arc::new(MemoryStore::new()), config.jwt.clone(), metrics)
        }
    };

    let app = build_router(state, &config.cors_origin)?;

    let addr = SocketAddr::from((config.host, config.port));
    info!(%addr, origin = %config.cors_origin, "restaurant server cooking");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
