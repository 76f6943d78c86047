//! Route definitions for the prediction queue status surface.

use axum::routing::get;
use axum::Router;

use crate::handlers::queue;
use crate::state::AppState;

/// Routes mounted at `/queue`.
///
/// ```text
/// GET  /status  -> get_queue_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(queue::get_queue_status))
}
