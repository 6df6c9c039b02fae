//! User entity model and DTOs.

use hrflow_core::policy::Member;
use hrflow_core::records::PublicUser;
use hrflow_core::reference::UserSummary;
use hrflow_core::roles::{AccountStatus, Role};
use hrflow_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`PublicUser`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub phone: Option<String>,
    pub salary: Option<f64>,
    pub profile_picture: Option<String>,
    pub is_online: bool,
    pub created_by: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub status: AccountStatus,
    pub created_at: Timestamp,
}

impl User {
    /// Position in the ownership chain, for policy checks.
    pub fn member(&self) -> Member {
        Member {
            id: self.id,
            role: self.role,
            created_by: self.created_by,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            profile_picture: self.profile_picture.clone(),
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            phone: self.phone.clone(),
            salary: self.salary,
            profile_picture: self.profile_picture.clone(),
            is_online: self.is_online,
            created_by: self.created_by,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub salary: Option<f64>,
    pub profile_picture: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub salary: Option<f64>,
    pub profile_picture: Option<String>,
    pub status: Option<AccountStatus>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.salary.is_none()
            && self.profile_picture.is_none()
            && self.status.is_none()
    }
}
