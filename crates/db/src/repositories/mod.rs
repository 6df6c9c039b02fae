//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod attendance_repo;
pub mod leave_repo;
pub mod meeting_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod task_repo;
pub mod user_repo;

pub use attendance_repo::AttendanceRepo;
pub use leave_repo::LeaveRepo;
pub use meeting_repo::MeetingRepo;
pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;

use hrflow_core::policy::Scope;
use hrflow_core::types::DbId;

/// A `WHERE` predicate for a list scope and the id bound as `$1`.
///
/// `Scope::All` yields `TRUE` and binds nothing.
pub(crate) struct ScopeFilter {
    pub clause: &'static str,
    pub bind: Option<DbId>,
}

impl ScopeFilter {
    /// Build a filter from per-variant predicates that reference `$1`.
    pub(crate) fn new(
        scope: Scope,
        subject: &'static str,
        participant: &'static str,
        managed: &'static str,
    ) -> Self {
        match scope {
            Scope::All => ScopeFilter {
                clause: "TRUE",
                bind: None,
            },
            Scope::Subject(id) => ScopeFilter {
                clause: subject,
                bind: Some(id),
            },
            Scope::Participant(id) => ScopeFilter {
                clause: participant,
                bind: Some(id),
            },
            Scope::Managed(id) => ScopeFilter {
                clause: managed,
                bind: Some(id),
            },
        }
    }

    /// Placeholder for the next parameter after the scope id.
    pub(crate) fn next_param(&self) -> &'static str {
        if self.bind.is_some() {
            "$2"
        } else {
            "$1"
        }
    }
}
