//! The three account roles and the ownership chain between them.
//!
//! `admin` creates and owns `hr` accounts; `hr` creates and owns `employee`
//! accounts (recorded in `users.created_by`).

use crate::error::CoreError;
use crate::types::string_enum;

string_enum! {
    /// Account role.
    pub enum Role {
        Admin => "admin",
        Hr => "hr",
        Employee => "employee",
    }
}

string_enum! {
    /// Whether an account may log in.
    pub enum AccountStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

impl Role {
    /// The single role this role is allowed to create, if any.
    pub fn creatable_role(self) -> Option<Role> {
        match self {
            Role::Admin => Some(Role::Hr),
            Role::Hr => Some(Role::Employee),
            Role::Employee => None,
        }
    }

    /// The role one step above in the chain. Leave requests go to it.
    pub fn superior(self) -> Option<Role> {
        match self {
            Role::Admin => None,
            Role::Hr => Some(Role::Admin),
            Role::Employee => Some(Role::Hr),
        }
    }
}

/// Enforce the role-creation hierarchy: admin creates hr, hr creates employee.
pub fn validate_role_creation(actor: Role, requested: Role) -> Result<(), CoreError> {
    if actor.creatable_role() == Some(requested) {
        Ok(())
    } else {
        Err(CoreError::forbidden(format!(
            "Role not allowed: {actor} cannot create a {requested} account"
        )))
    }
}
