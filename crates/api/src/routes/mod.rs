pub mod health;
pub mod queue;
pub mod sequences;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /queue/status    scheduler liveness + per-tool queue counts
/// /sequences       submit a sequence for prediction (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/queue", queue::router())
        .nest("/sequences", sequences::router())
}
