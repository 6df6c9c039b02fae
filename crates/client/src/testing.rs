//! In-memory [`HrApi`] used by the context unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use hrflow_core::credentials::{derive_credentials, DEFAULT_EMAIL_DOMAIN};
use hrflow_core::leave::LeaveStatus;
use hrflow_core::meeting::MeetingStatus;
use hrflow_core::records::{
    AttendanceRecord, LeaveRecord, MeetingRecord, NotificationRecord, PublicUser, TaskRecord,
};
use hrflow_core::reference::{Ref, UserSummary};
use hrflow_core::roles::{AccountStatus, Role};
use hrflow_core::task::ApprovalStatus;
use hrflow_core::types::DbId;

use crate::api::{CreatedUser, Credentials, HrApi, Session};
use crate::error::{ClientError, ClientResult};
use crate::requests::{NewAttendance, NewLeave, NewMeeting, NewTask, NewUser, TaskProgress, UserPatch};

pub fn user(id: DbId, name: &str, role: Role, created_by: Option<DbId>) -> PublicUser {
    let email = derive_credentials(name, DEFAULT_EMAIL_DOMAIN).unwrap().email;
    PublicUser {
        id,
        name: name.into(),
        email,
        role,
        phone: None,
        salary: None,
        profile_picture: None,
        is_online: false,
        created_by,
        status: AccountStatus::Active,
        created_at: Utc::now(),
    }
}

pub fn summary(id: DbId) -> UserSummary {
    UserSummary {
        id,
        name: format!("User {id}"),
        email: format!("user{id}@company.com"),
        role: Role::Employee,
        profile_picture: None,
    }
}

fn bare(r: &Ref<UserSummary>) -> Ref<UserSummary> {
    Ref::Id(r.id())
}

#[derive(Default)]
pub struct FakeApi {
    users: Mutex<Vec<PublicUser>>,
    tasks: Mutex<Vec<TaskRecord>>,
    meetings: Mutex<Vec<MeetingRecord>>,
    notifications: Mutex<Vec<NotificationRecord>>,
    signed_in: Mutex<Option<DbId>>,
    expired: AtomicBool,
    next_id: AtomicI64,
    calls: Mutex<HashMap<&'static str, usize>>,
    latency: Mutex<Option<Duration>>,
}

impl FakeApi {
    pub fn with_users(users: Vec<PublicUser>) -> Self {
        let api = Self::default();
        *api.users.lock().unwrap() = users;
        api.next_id.store(100, Ordering::SeqCst);
        api
    }

    /// Make `list_tasks` take `delay` before answering.
    pub fn set_latency(&self, delay: Duration) {
        *self.latency.lock().unwrap() = Some(delay);
    }

    pub fn seed_tasks(&self, tasks: Vec<TaskRecord>) {
        *self.tasks.lock().unwrap() = tasks;
    }

    pub fn seed_meetings(&self, meetings: Vec<MeetingRecord>) {
        *self.meetings.lock().unwrap() = meetings;
    }

    pub fn seed_notifications(&self, notifications: Vec<NotificationRecord>) {
        *self.notifications.lock().unwrap() = notifications;
    }

    /// Every later call answers 401.
    pub fn expire_session(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    fn hit(&self, endpoint: &'static str) -> ClientResult<()> {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
        if self.expired.load(Ordering::SeqCst) {
            return Err(ClientError::Unauthenticated("Token expired".into()));
        }
        Ok(())
    }

    fn unsupported<T>(endpoint: &str) -> ClientResult<T> {
        Err(ClientError::Internal(format!("{endpoint} is not faked")))
    }
}

#[async_trait]
impl HrApi for FakeApi {
    async fn login(&self, email: &str, _password: &str) -> ClientResult<Session> {
        self.hit("login")?;
        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| ClientError::Unauthenticated("Invalid credentials".into()))?;
        *self.signed_in.lock().unwrap() = Some(user.id);
        Ok(Session {
            token: format!("token-{}", user.id),
            user,
        })
    }

    async fn logout(&self) -> ClientResult<()> {
        self.hit("logout")?;
        *self.signed_in.lock().unwrap() = None;
        Ok(())
    }

    async fn me(&self) -> ClientResult<PublicUser> {
        self.hit("me")?;
        let signed_in = *self.signed_in.lock().unwrap();
        let id = signed_in.ok_or_else(|| ClientError::Unauthenticated("No token".into()))?;
        let users = self.users.lock().unwrap();
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| ClientError::Unauthenticated("User not found".into()))
    }

    async fn list_users(&self) -> ClientResult<Vec<PublicUser>> {
        self.hit("list_users")?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, input: &NewUser) -> ClientResult<CreatedUser> {
        self.hit("create_user")?;
        let creds = derive_credentials(&input.name, DEFAULT_EMAIL_DOMAIN)
            .map_err(|e| ClientError::BadRequest(e.to_string()))?;
        let creator = *self.signed_in.lock().unwrap();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = user(id, &input.name, input.role.unwrap_or(Role::Employee), creator);
        self.users.lock().unwrap().push(created.clone());
        Ok(CreatedUser {
            user: created,
            credentials: Credentials {
                email: creds.email,
                password: creds.password,
            },
        })
    }

    async fn update_user(&self, id: DbId, patch: &UserPatch) -> ClientResult<PublicUser> {
        self.hit("update_user")?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("User with id {id} not found")))?;
        if let Some(name) = &patch.name {
            user.name = name.clone();
        }
        if let Some(phone) = &patch.phone {
            user.phone = Some(phone.clone());
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: DbId) -> ClientResult<()> {
        self.hit("delete_user")?;
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(ClientError::NotFound(format!("User with id {id} not found")));
        }
        Ok(())
    }

    async fn list_tasks(&self) -> ClientResult<Vec<TaskRecord>> {
        self.hit("list_tasks")?;
        let delay = *self.latency.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn create_task(&self, _input: &NewTask) -> ClientResult<TaskRecord> {
        Self::unsupported("create_task")
    }

    async fn update_task_status(
        &self,
        id: DbId,
        input: &TaskProgress,
    ) -> ClientResult<TaskRecord> {
        self.hit("update_task_status")?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("Task with id {id} not found")))?;
        task.status = input.status;
        // Mutation responses are not populated.
        let mut returned = task.clone();
        returned.assigned_to = bare(&task.assigned_to);
        returned.assigned_by = bare(&task.assigned_by);
        Ok(returned)
    }

    async fn review_task(&self, _id: DbId, _decision: ApprovalStatus) -> ClientResult<TaskRecord> {
        Self::unsupported("review_task")
    }

    async fn delete_task(&self, id: DbId) -> ClientResult<()> {
        self.hit("delete_task")?;
        self.tasks.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn list_leaves(&self) -> ClientResult<Vec<LeaveRecord>> {
        self.hit("list_leaves")?;
        Ok(Vec::new())
    }

    async fn apply_leave(&self, _input: &NewLeave) -> ClientResult<LeaveRecord> {
        Self::unsupported("apply_leave")
    }

    async fn decide_leave(&self, _id: DbId, _status: LeaveStatus) -> ClientResult<LeaveRecord> {
        Self::unsupported("decide_leave")
    }

    async fn list_attendance(
        &self,
        _date: Option<NaiveDate>,
    ) -> ClientResult<Vec<AttendanceRecord>> {
        self.hit("list_attendance")?;
        Ok(Vec::new())
    }

    async fn mark_attendance(&self, _input: &NewAttendance) -> ClientResult<AttendanceRecord> {
        Self::unsupported("mark_attendance")
    }

    async fn list_meetings(&self) -> ClientResult<Vec<MeetingRecord>> {
        self.hit("list_meetings")?;
        Ok(self.meetings.lock().unwrap().clone())
    }

    async fn schedule_meeting(&self, _input: &NewMeeting) -> ClientResult<MeetingRecord> {
        Self::unsupported("schedule_meeting")
    }

    async fn update_meeting_status(
        &self,
        _id: DbId,
        _status: MeetingStatus,
    ) -> ClientResult<MeetingRecord> {
        Self::unsupported("update_meeting_status")
    }

    async fn list_notifications(&self) -> ClientResult<Vec<NotificationRecord>> {
        self.hit("list_notifications")?;
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn mark_notification_read(&self, _id: DbId) -> ClientResult<NotificationRecord> {
        Self::unsupported("mark_notification_read")
    }

    async fn mark_all_notifications_read(&self) -> ClientResult<u64> {
        self.hit("mark_all_notifications_read")?;
        let mut marked = 0;
        for note in self.notifications.lock().unwrap().iter_mut().filter(|n| !n.read) {
            note.read = true;
            marked += 1;
        }
        Ok(marked)
    }
}
