//! The REST operations the client caches depend on.

use async_trait::async_trait;
use chrono::NaiveDate;
use hrflow_core::leave::LeaveStatus;
use hrflow_core::meeting::MeetingStatus;
use hrflow_core::records::{
    AttendanceRecord, LeaveRecord, MeetingRecord, NotificationRecord, PublicUser, TaskRecord,
};
use hrflow_core::task::ApprovalStatus;
use hrflow_core::types::DbId;
use serde::Deserialize;

use crate::error::ClientResult;
use crate::requests::{NewAttendance, NewLeave, NewMeeting, NewTask, NewUser, TaskProgress, UserPatch};

/// A signed-in session as returned by `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

/// Login credentials generated for a new account. Shown once.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUser {
    pub user: PublicUser,
    pub credentials: Credentials,
}

/// Typed REST surface used by [`IdentityContext`](crate::IdentityContext)
/// and [`RecordsContext`](crate::RecordsContext).
#[async_trait]
pub trait HrApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ClientResult<Session>;
    async fn logout(&self) -> ClientResult<()>;
    async fn me(&self) -> ClientResult<PublicUser>;

    async fn list_users(&self) -> ClientResult<Vec<PublicUser>>;
    async fn create_user(&self, input: &NewUser) -> ClientResult<CreatedUser>;
    async fn update_user(&self, id: DbId, patch: &UserPatch) -> ClientResult<PublicUser>;
    async fn delete_user(&self, id: DbId) -> ClientResult<()>;

    async fn list_tasks(&self) -> ClientResult<Vec<TaskRecord>>;
    async fn create_task(&self, input: &NewTask) -> ClientResult<TaskRecord>;
    async fn update_task_status(&self, id: DbId, input: &TaskProgress)
        -> ClientResult<TaskRecord>;
    async fn review_task(&self, id: DbId, decision: ApprovalStatus) -> ClientResult<TaskRecord>;
    async fn delete_task(&self, id: DbId) -> ClientResult<()>;

    async fn list_leaves(&self) -> ClientResult<Vec<LeaveRecord>>;
    async fn apply_leave(&self, input: &NewLeave) -> ClientResult<LeaveRecord>;
    async fn decide_leave(&self, id: DbId, status: LeaveStatus) -> ClientResult<LeaveRecord>;

    async fn list_attendance(&self, date: Option<NaiveDate>)
        -> ClientResult<Vec<AttendanceRecord>>;
    async fn mark_attendance(&self, input: &NewAttendance) -> ClientResult<AttendanceRecord>;

    async fn list_meetings(&self) -> ClientResult<Vec<MeetingRecord>>;
    async fn schedule_meeting(&self, input: &NewMeeting) -> ClientResult<MeetingRecord>;
    async fn update_meeting_status(
        &self,
        id: DbId,
        status: MeetingStatus,
    ) -> ClientResult<MeetingRecord>;

    async fn list_notifications(&self) -> ClientResult<Vec<NotificationRecord>>;
    async fn mark_notification_read(&self, id: DbId) -> ClientResult<NotificationRecord>;
    /// Returns how many notifications flipped to read.
    async fn mark_all_notifications_read(&self) -> ClientResult<u64>;
}
