//! HTTP handlers, one module per resource.

pub mod attendance;
pub mod auth;
pub mod directory;
pub mod leaves;
pub mod meetings;
pub mod messages;
pub mod notifications;
pub mod tasks;
pub mod users;
