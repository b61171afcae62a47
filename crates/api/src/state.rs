use std::sync::Arc;

use clinica_storage::DynObjectStore;

use crate::cache::ContentCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: clinica_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object store holding uploaded images.
    pub storage: DynObjectStore,
    /// Short-lived snapshot of the `site_content` table.
    pub content: Arc<ContentCache>,
}
