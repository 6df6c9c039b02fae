pub mod attendance;
pub mod auth;
pub mod health;
pub mod leaves;
pub mod meetings;
pub mod messages;
pub mod notifications;
pub mod tasks;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  WebSocket (bearer auth on upgrade)
///
/// /auth/login                          login (public)
/// /auth/logout                         logout
/// /auth/me                             current user
///
/// /users                               list, create
/// /users/{id}                          get, update, delete
/// /users/me/password                   change own password (PUT)
///
/// /tasks                               list, create
/// /tasks/{id}                          delete
/// /tasks/{id}/status                   assignee progress (PUT)
/// /tasks/{id}/approval                 assigner review (PUT)
///
/// /leaves                              list, apply
/// /leaves/{id}/decision                approve or reject (PUT)
///
/// /attendance                          list (?date=), mark
///
/// /meetings                            list, schedule
/// /meetings/{id}/status                complete or cancel (PUT)
///
/// /notifications                       list (?unreadOnly=), send
/// /notifications/{id}/read             mark read (PUT)
/// /notifications/read-all              mark all read (PUT)
/// /notifications/unread-count          unread count
///
/// /messages                            send
/// /messages/{userId}                   conversation with a user
/// /messages/{id}/read                  mark read (PUT)
/// /messages/unread-count               unread count
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/tasks", tasks::router())
        .nest("/leaves", leaves::router())
        .nest("/attendance", attendance::router())
        .nest("/meetings", meetings::router())
        .nest("/notifications", notifications::router())
        .nest("/messages", messages::router())
}
