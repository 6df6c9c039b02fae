//! Route definitions for the `/meetings` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::meetings;
use crate::state::AppState;

/// Routes mounted at `/meetings`.
///
/// ```text
/// GET    /               -> list_meetings
/// POST   /               -> schedule_meeting
/// PUT    /{id}/status    -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(meetings::list_meetings).post(meetings::schedule_meeting),
        )
        .route("/{id}/status", put(meetings::update_status))
}
