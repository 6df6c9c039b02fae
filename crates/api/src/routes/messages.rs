//! Route definitions for the `/messages` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::messages;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// POST   /                 -> create_message
/// GET    /unread-count     -> unread_count
/// GET    /{id}             -> conversation (id of the other user)
/// PUT    /{id}/read        -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(messages::create_message))
        .route("/unread-count", get(messages::unread_count))
        .route("/{id}", get(messages::conversation))
        .route("/{id}/read", put(messages::mark_read))
}
