//! Shared response envelope types for API handlers.
//!
//! Resource responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "count": n }` payload for the unread-count endpoints.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// `{ "message": ... }` payload for endpoints with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
