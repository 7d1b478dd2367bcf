pub mod admin_guard;
pub mod app;
pub mod app_state;
pub mod cart_handlers;
pub mod config;
pub mod extract;
pub mod memory_store;
pub mod menu_handlers;
pub mod metrics;
pub mod models;
pub mod mongo_store;
pub mod review_handlers;
pub mod store;
pub mod token_handlers;
pub mod trace;
pub mod user_handlers;

pub use app::build_router;
pub use app_state::AppState;
pub use common_http_errors::ApiError;
pub use memory_store::MemoryStore;
pub use mongo_store::MongoStore;
