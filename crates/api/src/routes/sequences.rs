//! Route definitions for sequence submission.

use axum::routing::post;
use axum::Router;

use crate::handlers::sequences;
use crate::state::AppState;

/// Routes mounted at `/sequences`.
///
/// ```text
/// POST /  -> submit_sequence
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(sequences::submit_sequence))
}
