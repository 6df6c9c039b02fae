//! Domain building blocks shared by every hrflow crate.
//!
//! This crate has no internal dependencies so the policy, state machines,
//! and validation rules can be used by the API server, the store backends
//! and the client alike.

pub mod types;

pub mod attendance;
pub mod credentials;
pub mod error;
pub mod leave;
pub mod meeting;
pub mod message;
pub mod notification;
pub mod policy;
pub mod records;
pub mod reference;
pub mod roles;
pub mod task;
