//! Route definitions for the `/attendance` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// GET    /    -> list_attendance (?date=YYYY-MM-DD)
/// POST   /    -> mark_attendance
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(attendance::list_attendance).post(attendance::mark_attendance),
    )
}
