use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use profold_pipeline::decomposer::Decomposer;
use profold_pipeline::registry::SequenceRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: profold_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Deduplicating sequence registry (submission entry point).
    pub registry: Arc<SequenceRegistry>,
    /// Conserved-domain decomposer.
    pub decomposer: Arc<Decomposer>,
    /// Liveness flag of the queue scheduler loop.
    pub scheduler_running: Arc<AtomicBool>,
}
