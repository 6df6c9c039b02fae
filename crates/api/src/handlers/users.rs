//! Handlers for the `/users` resource.
//!
//! Accounts are created by their manager with derived credentials; see
//! [`hrflow_core::credentials`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hrflow_core::credentials::derive_credentials;
use hrflow_core::error::CoreError;
use hrflow_core::policy::{self, Action, Member, Resource};
use hrflow_core::records::PublicUser;
use hrflow_core::roles::{validate_role_creation, AccountStatus, Role};
use hrflow_core::types::DbId;
use hrflow_db::models::{CreateUser, UpdateUser, User};
use hrflow_db::store::UQ_USERS_EMAIL;
use hrflow_db::StoreError;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Defaults to the one role the caller may create.
    pub role: Option<Role>,
    pub phone: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    pub profile_picture: Option<String>,
}

/// Login credentials generated for a new account. Returned only once.
#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub user: PublicUser,
    pub credentials: Credentials,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    pub profile_picture: Option<String>,
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Public view of `user` for `viewer`. Salary is only shown to the account
/// itself and to its manager.
pub fn present(viewer: &Member, user: &User) -> PublicUser {
    let mut public = user.to_public();
    if viewer.id != user.id && !policy::manages(viewer, &user.member()) {
        public.salary = None;
    }
    public
}

/// Load a user the caller is allowed to see; anything else is a 404.
async fn find_visible(state: &AppState, viewer: &Member, id: DbId) -> AppResult<User> {
    state
        .store
        .find_user(id)
        .await?
        .filter(|u| policy::can_see_user(viewer, &u.member()))
        .ok_or_else(|| AppError::not_found("User", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/users
///
/// The caller's roster: everyone for admins; admins, self and own
/// employees for hr; self, own hr and co-workers for employees.
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PublicUser>>>> {
    let viewer = auth.member();
    let scope = policy::list_scope(&viewer, Resource::User);
    let users = state.store.list_users(scope).await?;

    Ok(Json(DataResponse {
        data: users.iter().map(|u| present(&viewer, u)).collect(),
    }))
}

/// POST /api/users
///
/// Admins create hr accounts; hr creates employees. The generated
/// credentials are returned in the response and nowhere else.
pub async fn create_user(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedUser>>)> {
    let actor = auth.member();
    policy::require(&actor, Resource::User, Action::Create)?;

    let role = match input.role.or(actor.role.creatable_role()) {
        Some(role) => role,
        None => return Err(CoreError::forbidden("You cannot create accounts").into()),
    };
    validate_role_creation(actor.role, role)?;

    let credentials = derive_credentials(&input.name, &state.config.credential_domain)?;

    // Collisions are rejected, never resolved by overwriting.
    let taken = || {
        AppError::Core(CoreError::Conflict(format!(
            "An account with email {} already exists",
            credentials.email
        )))
    };
    if state
        .store
        .find_user_by_email(&credentials.email)
        .await?
        .is_some()
    {
        return Err(taken());
    }

    let password_hash = hash_password(&credentials.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        name: input.name.trim().to_string(),
        email: credentials.email.clone(),
        password_hash,
        role,
        phone: input.phone,
        salary: input.salary,
        profile_picture: input.profile_picture,
        created_by: Some(actor.id),
    };
    let user = match state.store.create_user(&create).await {
        Ok(user) => user,
        Err(StoreError::UniqueViolation(c)) if c == UQ_USERS_EMAIL => return Err(taken()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = actor.id,
        "User account created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedUser {
                user: present(&actor, &user),
                credentials: Credentials {
                    email: credentials.email,
                    password: credentials.password,
                },
            },
        }),
    ))
}

/// GET /api/users/{id}
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublicUser>>> {
    let viewer = auth.member();
    let user = find_visible(&state, &viewer, id).await?;
    Ok(Json(DataResponse {
        data: present(&viewer, &user),
    }))
}

/// PUT /api/users/{id}
///
/// Users edit their own name, phone and picture. The managing admin/hr may
/// also set salary and status.
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<PublicUser>>> {
    let actor = auth.member();
    policy::require(&actor, Resource::User, Action::Update)?;

    let target = find_visible(&state, &actor, id).await?;
    let is_self = actor.id == target.id;
    let is_manager = policy::manages(&actor, &target.member());
    if !is_self && !is_manager {
        return Err(AppError::not_found("User", id));
    }
    if !is_manager && (input.salary.is_some() || input.status.is_some()) {
        return Err(CoreError::forbidden(
            "Only the account's manager may change salary or status",
        )
        .into());
    }

    let patch = UpdateUser {
        name: input.name.map(|n| n.trim().to_string()),
        phone: input.phone,
        salary: input.salary,
        profile_picture: input.profile_picture,
        status: input.status,
    };
    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let user = state
        .store
        .update_user(id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    tracing::info!(user_id = id, updated_by = actor.id, "User updated");
    Ok(Json(DataResponse {
        data: present(&actor, &user),
    }))
}

/// DELETE /api/users/{id}
///
/// Only the account's manager may delete it. An hr account that still has
/// employees cannot be removed.
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let actor = auth.member();
    policy::require(&actor, Resource::User, Action::Delete)?;

    let target = find_visible(&state, &actor, id).await?;
    if !policy::manages(&actor, &target.member()) {
        return Err(AppError::not_found("User", id));
    }

    if target.role == Role::Hr {
        let roster = state
            .store
            .list_users(policy::Scope::Managed(target.id))
            .await?;
        let has_employees = roster
            .iter()
            .any(|u| u.role == Role::Employee && u.created_by == Some(target.id));
        if has_employees {
            return Err(CoreError::Conflict(
                "This hr account still manages employees".into(),
            )
            .into());
        }
    }

    if !state.store.delete_user(id).await? {
        return Err(AppError::not_found("User", id));
    }

    tracing::info!(user_id = id, deleted_by = actor.id, "User deleted");
    Ok(Json(MessageResponse {
        message: "User deleted",
    }))
}

/// PUT /api/users/me/password
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = state
        .store
        .find_user(auth.id())
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.id()))?;

    let current_ok = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_ok {
        return Err(CoreError::validation("Current password is incorrect").into());
    }
    validate_password_strength(&input.new_password).map_err(CoreError::Validation)?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    state.store.update_password(user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(MessageResponse {
        message: "Password updated",
    }))
}
