//! Authorization policy: capabilities, list scoping, and ownership checks.
//!
//! Every handler goes through the same three questions:
//!
//! 1. May this role perform this action on this resource at all?
//!    ([`require`], backed by the capability table in [`permits`]).
//! 2. Which records may the actor see? ([`list_scope`]).
//! 3. May the actor touch this particular record? (the `can_*` predicates).

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::{string_enum, DbId};

string_enum! {
    /// Resource families guarded by the policy.
    pub enum Resource {
        User => "user",
        Task => "task",
        Leave => "leave",
        Attendance => "attendance",
        Meeting => "meeting",
        Notification => "notification",
        Message => "message",
    }
}

string_enum! {
    /// Operations on a resource.
    pub enum Action {
        List => "list",
        Create => "create",
        Update => "update",
        Delete => "delete",
        /// Approve/reject (task approval, leave decision).
        Decide => "decide",
    }
}

/// A user's position in the ownership chain.
///
/// Used both for the acting user and for the target of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub id: DbId,
    pub role: Role,
    /// The admin or hr that created this account.
    pub created_by: Option<DbId>,
}

/// The record filter a list query must apply for a given actor.
///
/// Store backends interpret the variant per resource; see the `Store`
/// traits in `hrflow-db` for the exact predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// No restriction (admin).
    All,
    /// Records about the user themselves (assignee, requester, attendee,
    /// recipient).
    Subject(DbId),
    /// Records where the user is either the actor or the subject.
    Participant(DbId),
    /// Records belonging to the user's own employees, plus the user's own.
    Managed(DbId),
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Hr, Role::Employee];
const MANAGERS: &[Role] = &[Role::Admin, Role::Hr];
const REQUESTERS: &[Role] = &[Role::Hr, Role::Employee];

/// Roles allowed to perform `action` on `resource`.
fn allowed_roles(resource: Resource, action: Action) -> &'static [Role] {
    use Action::*;
    use Resource::*;

    match (resource, action) {
        (_, List) => ALL_ROLES,

        (User, Create | Delete) => MANAGERS,
        (User, Update) => ALL_ROLES,

        (Task, Create | Delete | Decide) => MANAGERS,
        (Task, Update) => ALL_ROLES,

        (Leave, Create) => REQUESTERS,
        (Leave, Decide) => MANAGERS,

        (Attendance, Create) => MANAGERS,

        (Meeting, Create | Update) => MANAGERS,

        (Notification, Create) => MANAGERS,
        (Notification, Update) => ALL_ROLES,

        (Message, Create | Update) => ALL_ROLES,

        _ => &[],
    }
}

/// Capability table lookup.
pub fn permits(role: Role, resource: Resource, action: Action) -> bool {
    allowed_roles(resource, action).contains(&role)
}

/// Fail with `Forbidden` unless the actor's role carries the capability.
pub fn require(actor: &Member, resource: Resource, action: Action) -> Result<(), CoreError> {
    if permits(actor.role, resource, action) {
        Ok(())
    } else {
        Err(CoreError::forbidden(format!(
            "A {} may not {action} {resource} records",
            actor.role
        )))
    }
}

/// The list filter for `actor` on `resource`.
pub fn list_scope(actor: &Member, resource: Resource) -> Scope {
    match (actor.role, resource) {
        (_, Resource::Notification | Resource::Message) => Scope::Subject(actor.id),
        (Role::Admin, _) => Scope::All,
        (Role::Hr, Resource::Task | Resource::Meeting) => Scope::Participant(actor.id),
        (Role::Hr, _) => Scope::Managed(actor.id),
        (Role::Employee, _) => Scope::Subject(actor.id),
    }
}

/// Whether `actor` owns `target`'s account.
///
/// Admins own every non-admin account; hr owns the employees it created.
pub fn manages(actor: &Member, target: &Member) -> bool {
    match actor.role {
        Role::Admin => target.role != Role::Admin,
        Role::Hr => target.role == Role::Employee && target.created_by == Some(actor.id),
        Role::Employee => false,
    }
}

/// Whether `target` appears in `actor`'s roster.
///
/// Mirrors the user-list scope: admins see everyone; hr sees admins, itself
/// and its employees; employees see themselves, their hr and co-workers
/// under the same hr.
pub fn can_see_user(actor: &Member, target: &Member) -> bool {
    if actor.id == target.id {
        return true;
    }
    match actor.role {
        Role::Admin => true,
        Role::Hr => target.role == Role::Admin || manages(actor, target),
        Role::Employee => match actor.created_by {
            Some(hr_id) => {
                target.id == hr_id
                    || (target.role == Role::Employee && target.created_by == Some(hr_id))
            }
            None => false,
        },
    }
}

/// Whether `actor` may assign a task to `assignee`.
pub fn can_assign(actor: &Member, assignee: &Member) -> Result<(), CoreError> {
    if actor.id != assignee.id && manages(actor, assignee) {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            "Tasks can only be assigned to accounts you manage",
        ))
    }
}

/// Whether `actor` may send a direct message to `receiver`.
pub fn can_message(actor: &Member, receiver: &Member) -> Result<(), CoreError> {
    if actor.id == receiver.id {
        return Err(CoreError::validation("Cannot send a message to yourself"));
    }
    if can_see_user(actor, receiver) {
        Ok(())
    } else {
        Err(CoreError::forbidden("You cannot message this user"))
    }
}

/// Whether `actor` may invite `attendee` to a meeting.
pub fn can_invite(actor: &Member, attendee: &Member) -> Result<(), CoreError> {
    if can_see_user(actor, attendee) {
        Ok(())
    } else {
        Err(CoreError::forbidden(format!(
            "User {} cannot be invited to your meetings",
            attendee.id
        )))
    }
}
