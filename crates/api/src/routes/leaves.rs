//! Route definitions for the `/leaves` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::leaves;
use crate::state::AppState;

/// Routes mounted at `/leaves`.
///
/// ```text
/// GET    /                 -> list_leaves
/// POST   /                 -> apply_leave
/// PUT    /{id}/decision    -> decide_leave
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leaves::list_leaves).post(leaves::apply_leave))
        .route("/{id}/decision", put(leaves::decide_leave))
}
