//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /                 -> list_notifications
/// POST   /                 -> send_notification
/// PUT    /read-all         -> mark_all_read
/// GET    /unread-count     -> unread_count
/// PUT    /{id}/read        -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notifications::list_notifications).post(notifications::send_notification),
        )
        .route("/read-all", put(notifications::mark_all_read))
        .route("/unread-count", get(notifications::unread_count))
        .route("/{id}/read", put(notifications::mark_read))
}
