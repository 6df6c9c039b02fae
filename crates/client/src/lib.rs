//! hrflow client - typed access to the REST API plus the two client-side
//! caches dashboards read from.
//!
//! [`ApiClient`] talks HTTP. [`IdentityContext`] keeps the signed-in user and
//! the people they can see; [`RecordsContext`] keeps tasks, leaves,
//! attendance, meetings and notifications. Both caches go through the
//! [`HrApi`] trait, so they can be driven by any transport.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod records;
pub mod requests;

#[cfg(test)]
mod testing;

pub use api::HrApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use identity::IdentityContext;
pub use records::RecordsContext;
