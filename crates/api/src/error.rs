use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hrflow_core::error::CoreError;
use hrflow_db::StoreError;
use serde_json::json;

use crate::auth::jwt::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`StoreError`] for backend
/// failures and [`AuthError`] for token problems. Implements
/// [`IntoResponse`] to produce consistent `{"error", "code"}` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `hrflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage backend error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request could not be authenticated.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for a 404 on `entity` with `id`.
    pub fn not_found(entity: &'static str, id: hrflow_core::types::DbId) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }
}

const SANITIZED: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Misconfigured(msg) => {
                    tracing::error!(error = %msg, "Server misconfigured");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "SERVER_MISCONFIGURED",
                        "Server is misconfigured".to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        SANITIZED.to_string(),
                    )
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- Authentication ---
            AppError::Auth(err) => match err {
                AuthError::MissingSecret => {
                    tracing::error!("Token secret missing; rejecting authenticated request");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "SERVER_MISCONFIGURED",
                        "Server is misconfigured".to_string(),
                    )
                }
                AuthError::Signing(e) => {
                    tracing::error!(error = %e, "Token signing failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        SANITIZED.to_string(),
                    )
                }
                other => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", other.to_string()),
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    SANITIZED.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Unique constraint violations map to 409.
/// - `RowNotFound` maps to 404.
/// - Lost connections and backend (non-SQL) failures map to 500
///   `UPSTREAM_FAILURE`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::UniqueViolation(constraint) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        StoreError::Database(sqlx::Error::RowNotFound) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        StoreError::Database(other) if is_connection_failure(other) => {
            tracing::error!(error = %other, "Database unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_FAILURE",
                "The storage backend is unavailable".to_string(),
            )
        }
        StoreError::Database(other) => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                SANITIZED.to_string(),
            )
        }
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "Store backend failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_FAILURE",
                "The storage backend failed to complete the request".to_string(),
            )
        }
    }
}

/// Errors that mean the database could not be reached, as opposed to a
/// query that ran and failed.
fn is_connection_failure(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
