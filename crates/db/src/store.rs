//! Store traits: the seam between the HTTP layer and a storage backend.
//!
//! Handlers hold an `Arc<dyn Store>` and never see a pool directly, so the
//! same router runs against Postgres ([`crate::PgStore`]) or the in-memory
//! backend ([`crate::MemoryStore`]).
//!
//! List methods take a [`Scope`] computed by the authorization policy.
//! Every backend interprets it the same way:
//!
//! | Resource   | `Subject(u)`                         | `Participant(u)`                | `Managed(u)`                                   |
//! |------------|--------------------------------------|---------------------------------|------------------------------------------------|
//! | users      | `u`, `u`'s hr, `u`'s co-workers      | same as `Subject`               | `u`, every admin, accounts created by `u`      |
//! | tasks      | assigned to `u`                      | assigned to or by `u`           | `Participant` plus tasks of `u`'s employees    |
//! | leaves     | filed by `u`                         | filed by or applied to `u`      | `Participant` plus leaves of `u`'s employees   |
//! | attendance | of `u`                               | of `u` or marked by `u`         | of `u` or of `u`'s employees                   |
//! | meetings   | `u` is an attendee                   | scheduled by `u` or attendee    | same as `Participant`                          |
//!
//! Lists are ordered newest first; conversations oldest first.

use async_trait::async_trait;
use chrono::NaiveDate;
use hrflow_core::leave::LeaveStatus;
use hrflow_core::meeting::MeetingStatus;
use hrflow_core::policy::Scope;
use hrflow_core::task::ApprovalStatus;
use hrflow_core::types::DbId;

use crate::models::{
    Attendance, CreateAttendance, CreateLeave, CreateMeeting, CreateMessage, CreateNotification,
    CreateTask, CreateUser, LeaveRequest, Meeting, Message, Notification, Task, TaskProgress,
    UpdateUser, User,
};

/// Name of the unique constraint on `users.email`.
pub const UQ_USERS_EMAIL: &str = "uq_users_email";

/// Name of the unique constraint on `attendance (employee_id, date)`.
pub const UQ_ATTENDANCE_DAY: &str = "uq_attendance_employee_date";

/// Name of the unique constraint on `meetings.meeting_link`.
pub const UQ_MEETING_LINK: &str = "uq_meetings_link";

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::UniqueViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::UniqueViolation`] on a duplicate email.
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;
    /// Exact, case-sensitive match.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Users with the given ids, in no particular order. Unknown ids are skipped.
    async fn find_users(&self, ids: &[DbId]) -> StoreResult<Vec<User>>;
    async fn list_users(&self, scope: Scope) -> StoreResult<Vec<User>>;
    /// The earliest-created admin, used as the fallback leave approver.
    async fn oldest_admin(&self) -> StoreResult<Option<User>>;
    /// Apply the set fields of `input`. `None` when the user does not exist.
    async fn update_user(&self, id: DbId, input: &UpdateUser) -> StoreResult<Option<User>>;
    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool>;
    async fn set_online(&self, id: DbId, online: bool) -> StoreResult<bool>;
    async fn delete_user(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, input: &CreateTask) -> StoreResult<Task>;
    async fn find_task(&self, id: DbId) -> StoreResult<Option<Task>>;
    async fn list_tasks(&self, scope: Scope) -> StoreResult<Vec<Task>>;
    /// Move the task from `progress.from` to `progress.to`.
    ///
    /// `None` if the task is gone or its status is no longer `from`.
    async fn advance_task(&self, id: DbId, progress: &TaskProgress) -> StoreResult<Option<Task>>;
    /// Record the assigner's decision on a completed, undecided task.
    ///
    /// `None` if the task is gone, not completed, or already decided.
    async fn review_task(&self, id: DbId, decision: ApprovalStatus) -> StoreResult<Option<Task>>;
    async fn delete_task(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait LeaveStore: Send + Sync {
    async fn create_leave(&self, input: &CreateLeave) -> StoreResult<LeaveRequest>;
    async fn find_leave(&self, id: DbId) -> StoreResult<Option<LeaveRequest>>;
    async fn list_leaves(&self, scope: Scope) -> StoreResult<Vec<LeaveRequest>>;
    /// Decide a pending request and stamp `responded_at`.
    ///
    /// `None` if the request is gone or no longer pending.
    async fn decide_leave(
        &self,
        id: DbId,
        decision: LeaveStatus,
    ) -> StoreResult<Option<LeaveRequest>>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Fails with [`StoreError::UniqueViolation`] (`uq_attendance_employee_date`)
    /// when the employee already has a mark for that day.
    async fn create_attendance(&self, input: &CreateAttendance) -> StoreResult<Attendance>;
    async fn list_attendance(
        &self,
        scope: Scope,
        date: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>>;
}

#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn create_meeting(&self, input: &CreateMeeting) -> StoreResult<Meeting>;
    async fn find_meeting(&self, id: DbId) -> StoreResult<Option<Meeting>>;
    async fn list_meetings(&self, scope: Scope) -> StoreResult<Vec<Meeting>>;
    /// `None` if the meeting is gone or its status is no longer `from`.
    async fn set_meeting_status(
        &self,
        id: DbId,
        from: MeetingStatus,
        to: MeetingStatus,
    ) -> StoreResult<Option<Meeting>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification>;
    async fn list_notifications(
        &self,
        user_id: DbId,
        unread_only: bool,
    ) -> StoreResult<Vec<Notification>>;
    /// Mark read, keeping the first `read_at`. `None` unless the
    /// notification exists and belongs to `user_id`.
    async fn mark_notification_read(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> StoreResult<Option<Notification>>;
    /// Returns how many notifications flipped to read.
    async fn mark_all_notifications_read(&self, user_id: DbId) -> StoreResult<u64>;
    async fn unread_notification_count(&self, user_id: DbId) -> StoreResult<i64>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create_message(&self, input: &CreateMessage) -> StoreResult<Message>;
    /// Every message between `a` and `b`, oldest first.
    async fn conversation(&self, a: DbId, b: DbId) -> StoreResult<Vec<Message>>;
    /// `None` unless the message exists and was sent to `receiver_id`.
    async fn mark_message_read(&self, id: DbId, receiver_id: DbId)
        -> StoreResult<Option<Message>>;
    async fn unread_message_count(&self, receiver_id: DbId) -> StoreResult<i64>;
}

/// Everything the API needs from a backend.
#[async_trait]
pub trait Store:
    UserStore
    + TaskStore
    + LeaveStore
    + AttendanceStore
    + MeetingStore
    + NotificationStore
    + MessageStore
{
    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Verify the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
