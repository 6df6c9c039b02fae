//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use hrflow_core::error::CoreError;
use hrflow_core::policy::Member;
use hrflow_core::records::PublicUser;
use hrflow_core::roles::{AccountStatus, Role};
use hrflow_core::types::DbId;

use crate::auth::jwt::{bearer_token, validate_token, AuthError};
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization: Bearer` token.
///
/// The full user record (minus the password hash) is loaded on every
/// request, so role changes and deletions take effect immediately.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.id(), role = %auth.role(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: PublicUser,
    /// Expiry of the presented token (UTC Unix timestamp).
    pub expires_at: i64,
}

impl AuthUser {
    pub fn id(&self) -> DbId {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn member(&self) -> Member {
        self.user.member()
    }

    /// Re-load the caller from the store, keeping the token expiry.
    ///
    /// Long-lived connections call this before acting so a deleted or
    /// deactivated account, or an expired token, stops working mid-session.
    pub async fn refresh(&self, state: &AppState) -> Result<Self, AppError> {
        if chrono::Utc::now().timestamp() >= self.expires_at {
            return Err(AuthError::ExpiredToken.into());
        }
        let user = load_active_user(state, self.id()).await?;
        Ok(AuthUser {
            user,
            expires_at: self.expires_at,
        })
    }
}

async fn load_active_user(state: &AppState, id: DbId) -> Result<PublicUser, AppError> {
    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if user.status == AccountStatus::Inactive {
        return Err(AppError::Core(CoreError::forbidden("Account is deactivated")));
    }
    Ok(user.to_public())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|v| v.to_str().map_err(|_| AuthError::MalformedToken))
            .transpose()?;
        let token = bearer_token(header)?;
        let claims = validate_token(token, &state.config.jwt)?;

        let user = load_active_user(state, claims.sub).await?;

        Ok(AuthUser {
            user,
            expires_at: claims.exp,
        })
    }
}
