//! Task entity model and DTOs.

use hrflow_core::records::{Submission, TaskRecord, UserRef};
use hrflow_core::task::{ApprovalStatus, Priority, TaskStatus};
use hrflow_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    #[sqlx(try_from = "String")]
    pub approval_status: ApprovalStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub allowed_formats: Vec<String>,
    pub submitted_at: Option<Timestamp>,
    pub submission: Option<Json<Submission>>,
    pub created_at: Timestamp,
}

impl Task {
    /// Convert to the wire shape, resolving user references with `user`.
    pub fn into_record(self, user: impl Fn(DbId) -> UserRef) -> TaskRecord {
        TaskRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            assigned_to: user(self.assigned_to),
            assigned_by: user(self.assigned_by),
            status: self.status,
            approval_status: self.approval_status,
            priority: self.priority,
            due_date: self.due_date,
            allowed_formats: self.allowed_formats,
            submitted_at: self.submitted_at,
            submission: self.submission.map(|Json(s)| s),
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a task. Status and approval start as `pending`.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub allowed_formats: Vec<String>,
}

/// A progress update applied by the assignee.
///
/// `submission` is only stored when the task reaches `completed`, which
/// also stamps `submitted_at`.
#[derive(Debug, Clone)]
pub struct TaskProgress {
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub submission: Option<Submission>,
}
