use std::str::FromStr;

use hrflow_core::credentials::DEFAULT_EMAIL_DOMAIN;

use crate::auth::jwt::JwtConfig;

/// Which storage backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::Invalid {
                var: "STORE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

/// The first admin account, seeded when the store has none.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Token signing configuration.
    pub jwt: JwtConfig,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Postgres`.
    pub database_url: Option<String>,
    /// Domain used for derived account emails.
    pub credential_domain: String,
    /// Prefix of generated meeting join links.
    pub meeting_base_url: String,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `5000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `STORE_BACKEND`           | `postgres`                 |
    /// | `DATABASE_URL`            | (none)                     |
    /// | `JWT_SECRET`              | (none)                     |
    /// | `CREDENTIAL_EMAIL_DOMAIN` | `company.com`              |
    /// | `MEETING_LINK_BASE`       | `https://meet.hrflow.app`  |
    ///
    /// `BOOTSTRAP_ADMIN_NAME`, `BOOTSTRAP_ADMIN_EMAIL` and
    /// `BOOTSTRAP_ADMIN_PASSWORD` seed the first admin when all three are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = var_or("HOST", "0.0.0.0");
        let port = parse_var("PORT", "5000")?;

        let cors_origins: Vec<String> = var_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", "30")?;
        let shutdown_timeout_secs = parse_var("SHUTDOWN_TIMEOUT_SECS", "30")?;
        let store_backend: StoreBackend = var_or("STORE_BACKEND", "postgres").parse()?;

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_NAME"),
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(name), Ok(email), Ok(password)) => Some(BootstrapAdmin {
                name,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            store_backend,
            database_url,
            credential_domain: var_or("CREDENTIAL_EMAIL_DOMAIN", DEFAULT_EMAIL_DOMAIN),
            meeting_base_url: var_or("MEETING_LINK_BASE", "https://meet.hrflow.app"),
            bootstrap_admin,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn parse_var<T: FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = var_or(name, default);
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { var: name, value })
}
