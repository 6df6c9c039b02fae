//! Postgres-backed [`Store`] that delegates to the repositories.

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
use crate::repositories::{
    AttendanceRepo, LeaveRepo, MeetingRepo, MessageRepo, NotificationRepo, TaskRepo, UserRepo,
};
use crate::store::{
    AttendanceStore, LeaveStore, MeetingStore, MessageStore, NotificationStore, Store,
    StoreResult, TaskStore, UserStore,
};
use crate::DbPool;

/// Store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_users(&self, ids: &[DbId]) -> StoreResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(UserRepo::find_many(&self.pool, ids).await?)
    }

    async fn list_users(&self, scope: Scope) -> StoreResult<Vec<User>> {
        Ok(UserRepo::list(&self.pool, scope).await?)
    }

    async fn oldest_admin(&self) -> StoreResult<Option<User>> {
        Ok(UserRepo::oldest_admin(&self.pool).await?)
    }

    async fn update_user(&self, id: DbId, input: &UpdateUser) -> StoreResult<Option<User>> {
        Ok(UserRepo::update(&self.pool, id, input).await?)
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool> {
        Ok(UserRepo::update_password(&self.pool, id, password_hash).await?)
    }

    async fn set_online(&self, id: DbId, online: bool) -> StoreResult<bool> {
        Ok(UserRepo::set_online(&self.pool, id, online).await?)
    }

    async fn delete_user(&self, id: DbId) -> StoreResult<bool> {
        Ok(UserRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, input: &CreateTask) -> StoreResult<Task> {
        Ok(TaskRepo::create(&self.pool, input).await?)
    }

    async fn find_task(&self, id: DbId) -> StoreResult<Option<Task>> {
        Ok(TaskRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self, scope: Scope) -> StoreResult<Vec<Task>> {
        Ok(TaskRepo::list(&self.pool, scope).await?)
    }

    async fn advance_task(&self, id: DbId, progress: &TaskProgress) -> StoreResult<Option<Task>> {
        Ok(TaskRepo::advance(&self.pool, id, progress).await?)
    }

    async fn review_task(&self, id: DbId, decision: ApprovalStatus) -> StoreResult<Option<Task>> {
        Ok(TaskRepo::review(&self.pool, id, decision).await?)
    }

    async fn delete_task(&self, id: DbId) -> StoreResult<bool> {
        Ok(TaskRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl LeaveStore for PgStore {
    async fn create_leave(&self, input: &CreateLeave) -> StoreResult<LeaveRequest> {
        Ok(LeaveRepo::create(&self.pool, input).await?)
    }

    async fn find_leave(&self, id: DbId) -> StoreResult<Option<LeaveRequest>> {
        Ok(LeaveRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_leaves(&self, scope: Scope) -> StoreResult<Vec<LeaveRequest>> {
        Ok(LeaveRepo::list(&self.pool, scope).await?)
    }

    async fn decide_leave(
        &self,
        id: DbId,
        decision: LeaveStatus,
    ) -> StoreResult<Option<LeaveRequest>> {
        Ok(LeaveRepo::decide(&self.pool, id, decision).await?)
    }
}

#[async_trait]
impl AttendanceStore for PgStore {
    async fn create_attendance(&self, input: &CreateAttendance) -> StoreResult<Attendance> {
        Ok(AttendanceRepo::create(&self.pool, input).await?)
    }

    async fn list_attendance(
        &self,
        scope: Scope,
        date: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>> {
        Ok(AttendanceRepo::list(&self.pool, scope, date).await?)
    }
}

#[async_trait]
impl MeetingStore for PgStore {
    async fn create_meeting(&self, input: &CreateMeeting) -> StoreResult<Meeting> {
        Ok(MeetingRepo::create(&self.pool, input).await?)
    }

    async fn find_meeting(&self, id: DbId) -> StoreResult<Option<Meeting>> {
        Ok(MeetingRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_meetings(&self, scope: Scope) -> StoreResult<Vec<Meeting>> {
        Ok(MeetingRepo::list(&self.pool, scope).await?)
    }

    async fn set_meeting_status(
        &self,
        id: DbId,
        from: MeetingStatus,
        to: MeetingStatus,
    ) -> StoreResult<Option<Meeting>> {
        Ok(MeetingRepo::set_status(&self.pool, id, from, to).await?)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification> {
        Ok(NotificationRepo::create(&self.pool, input).await?)
    }

    async fn list_notifications(
        &self,
        user_id: DbId,
        unread_only: bool,
    ) -> StoreResult<Vec<Notification>> {
        Ok(NotificationRepo::list_for_user(&self.pool, user_id, unread_only).await?)
    }

    async fn mark_notification_read(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> StoreResult<Option<Notification>> {
        Ok(NotificationRepo::mark_read(&self.pool, id, user_id).await?)
    }

    async fn mark_all_notifications_read(&self, user_id: DbId) -> StoreResult<u64> {
        Ok(NotificationRepo::mark_all_read(&self.pool, user_id).await?)
    }

    async fn unread_notification_count(&self, user_id: DbId) -> StoreResult<i64> {
        Ok(NotificationRepo::unread_count(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn create_message(&self, input: &CreateMessage) -> StoreResult<Message> {
        Ok(MessageRepo::create(&self.pool, input).await?)
    }

    async fn conversation(&self, a: DbId, b: DbId) -> StoreResult<Vec<Message>> {
        Ok(MessageRepo::conversation(&self.pool, a, b).await?)
    }

    async fn mark_message_read(
        &self,
        id: DbId,
        receiver_id: DbId,
    ) -> StoreResult<Option<Message>> {
        Ok(MessageRepo::mark_read(&self.pool, id, receiver_id).await?)
    }

    async fn unread_message_count(&self, receiver_id: DbId) -> StoreResult<i64> {
        Ok(MessageRepo::unread_count(&self.pool, receiver_id).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
