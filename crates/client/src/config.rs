//! Client configuration.

use std::time::Duration;

/// How often [`RecordsContext`](crate::RecordsContext) refetches by default.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:5000`. `/api` is appended.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout: u64,

    /// Bearer token to start with, if a session was persisted elsewhere.
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            token: None,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
