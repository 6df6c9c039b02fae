//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::Json;
use hrflow_core::error::CoreError;
use hrflow_core::records::PublicUser;
use hrflow_core::roles::AccountStatus;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{issue_token, AuthError};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login: a bearer token and the account it belongs to.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Exact, case-sensitive email match plus password verification. Marks the
/// account online.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    // Fail closed before touching any account.
    if !state.config.jwt.is_configured() {
        return Err(AuthError::MissingSecret.into());
    }

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = state
        .store
        .find_user_by_email(&input.email)
        .await?
        .ok_or_else(invalid)?;

    if user.status == AccountStatus::Inactive {
        return Err(AppError::Core(CoreError::forbidden("Account is deactivated")));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let token = issue_token(user.id, &state.config.jwt)?;
    state.store.set_online(user.id, true).await?;

    let mut public = user.to_public();
    public.is_online = true;
    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: public,
    }))
}

/// POST /api/auth/logout
///
/// Marks the account offline. The token itself stays valid until it
/// expires.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    state.store.set_online(auth.id(), false).await?;
    tracing::info!(user_id = auth.id(), "User logged out");
    Ok(Json(MessageResponse {
        message: "Logged out",
    }))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<DataResponse<PublicUser>> {
    Json(DataResponse { data: auth.user })
}
