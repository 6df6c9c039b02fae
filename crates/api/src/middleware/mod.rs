//! Request extractors that establish who is calling.
//!
//! - [`auth::AuthUser`] -- Resolves the bearer token to an active user.

pub mod auth;
