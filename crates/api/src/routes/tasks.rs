//! Route definitions for the `/tasks` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                 -> list_tasks
/// POST   /                 -> create_task
/// DELETE /{id}             -> delete_task
/// PUT    /{id}/status      -> update_status
/// PUT    /{id}/approval    -> review_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route("/{id}", delete(tasks::delete_task))
        .route("/{id}/status", put(tasks::update_status))
        .route("/{id}/approval", put(tasks::review_task))
}
