//! In-process [`Store`] used for local demos and the API test suite.
//!
//! All tables sit behind one `RwLock`, so each trait method is atomic with
//! respect to the others. Unique constraints are checked under the write
//! lock and reported with the same constraint names the Postgres schema
//! uses.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use hrflow_core::leave::LeaveStatus;
use hrflow_core::meeting::MeetingStatus;
use hrflow_core::policy::Scope;
use hrflow_core::roles::{AccountStatus, Role};
use hrflow_core::task::{ApprovalStatus, TaskStatus};
use hrflow_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use tokio::sync::RwLock;

use crate::models::{
    Attendance, CreateAttendance, CreateLeave, CreateMeeting, CreateMessage, CreateNotification,
    CreateTask, CreateUser, LeaveRequest, Meeting, Message, Notification, Task, TaskProgress,
    UpdateUser, User,
};
use crate::store::{
    AttendanceStore, LeaveStore, MeetingStore, MessageStore, NotificationStore, Store,
    StoreError, StoreResult, TaskStore, UserStore, UQ_ATTENDANCE_DAY, UQ_MEETING_LINK,
    UQ_USERS_EMAIL,
};

#[derive(Default)]
struct Tables {
    last_id: DbId,
    users: BTreeMap<DbId, User>,
    tasks: BTreeMap<DbId, Task>,
    leaves: BTreeMap<DbId, LeaveRequest>,
    attendance: BTreeMap<DbId, Attendance>,
    meetings: BTreeMap<DbId, Meeting>,
    notifications: BTreeMap<DbId, Notification>,
    messages: BTreeMap<DbId, Message>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    /// Whether `user_id` is an account created by `manager_id`.
    fn created_by(&self, user_id: DbId, manager_id: DbId) -> bool {
        self.users
            .get(&user_id)
            .is_some_and(|u| u.created_by == Some(manager_id))
    }

    fn user_visible(&self, scope: Scope, user: &User) -> bool {
        match scope {
            Scope::All => true,
            Scope::Subject(id) | Scope::Participant(id) => {
                let me = self.users.get(&id);
                let my_creator = me.and_then(|m| m.created_by);
                let my_hr = me
                    .filter(|m| m.role == Role::Employee)
                    .and_then(|m| m.created_by);
                user.id == id
                    || Some(user.id) == my_creator
                    || (user.role == Role::Employee
                        && my_hr.is_some()
                        && user.created_by == my_hr)
            }
            Scope::Managed(id) => {
                user.id == id || user.role == Role::Admin || user.created_by == Some(id)
            }
        }
    }

    fn task_visible(&self, scope: Scope, task: &Task) -> bool {
        match scope {
            Scope::All => true,
            Scope::Subject(id) => task.assigned_to == id,
            Scope::Participant(id) => task.assigned_to == id || task.assigned_by == id,
            Scope::Managed(id) => {
                task.assigned_to == id
                    || task.assigned_by == id
                    || self.created_by(task.assigned_to, id)
            }
        }
    }

    fn leave_visible(&self, scope: Scope, leave: &LeaveRequest) -> bool {
        match scope {
            Scope::All => true,
            Scope::Subject(id) => leave.employee_id == id,
            Scope::Participant(id) => leave.employee_id == id || leave.applied_to == id,
            Scope::Managed(id) => {
                leave.employee_id == id
                    || leave.applied_to == id
                    || self.created_by(leave.employee_id, id)
            }
        }
    }

    fn attendance_visible(&self, scope: Scope, mark: &Attendance) -> bool {
        match scope {
            Scope::All => true,
            Scope::Subject(id) => mark.employee_id == id,
            Scope::Participant(id) => mark.employee_id == id || mark.marked_by == id,
            Scope::Managed(id) => mark.employee_id == id || self.created_by(mark.employee_id, id),
        }
    }
}

fn meeting_visible(scope: Scope, meeting: &Meeting) -> bool {
    match scope {
        Scope::All => true,
        Scope::Subject(id) => meeting.attendees.contains(&id),
        Scope::Participant(id) | Scope::Managed(id) => meeting.involves(id),
    }
}

/// Sort by `(created_at, id)` descending.
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (Timestamp, DbId)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

/// Store that keeps every table in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation(UQ_USERS_EMAIL.to_string()));
        }
        let user = User {
            id: t.next_id(),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            phone: input.phone.clone(),
            salary: input.salary,
            profile_picture: input.profile_picture.clone(),
            is_online: false,
            created_by: input.created_by,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_users(&self, ids: &[DbId]) -> StoreResult<Vec<User>> {
        let t = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| t.users.get(id).cloned()).collect())
    }

    async fn list_users(&self, scope: Scope) -> StoreResult<Vec<User>> {
        let t = self.tables.read().await;
        let mut users: Vec<User> = t
            .users
            .values()
            .filter(|u| t.user_visible(scope, u))
            .cloned()
            .collect();
        newest_first(&mut users, |u| (u.created_at, u.id));
        Ok(users)
    }

    async fn oldest_admin(&self) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users
            .values()
            .filter(|u| u.role == Role::Admin)
            .min_by_key(|u| (u.created_at, u.id))
            .cloned())
    }

    async fn update_user(&self, id: DbId, input: &UpdateUser) -> StoreResult<Option<User>> {
        let mut t = self.tables.write().await;
        let Some(user) = t.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            user.name = name.clone();
        }
        if let Some(phone) = &input.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(salary) = input.salary {
            user.salary = Some(salary);
        }
        if let Some(picture) = &input.profile_picture {
            user.profile_picture = Some(picture.clone());
        }
        if let Some(status) = input.status {
            user.status = status;
        }
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        let Some(user) = t.users.get_mut(&id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_string();
        Ok(true)
    }

    async fn set_online(&self, id: DbId, online: bool) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        let Some(user) = t.users.get_mut(&id) else {
            return Ok(false);
        };
        user.is_online = online;
        Ok(true)
    }

    async fn delete_user(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, input: &CreateTask) -> StoreResult<Task> {
        let mut t = self.tables.write().await;
        let task = Task {
            id: t.next_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            assigned_to: input.assigned_to,
            assigned_by: input.assigned_by,
            status: TaskStatus::Pending,
            approval_status: ApprovalStatus::Pending,
            priority: input.priority,
            due_date: input.due_date,
            allowed_formats: input.allowed_formats.clone(),
            submitted_at: None,
            submission: None,
            created_at: Utc::now(),
        };
        t.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: DbId) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, scope: Scope) -> StoreResult<Vec<Task>> {
        let t = self.tables.read().await;
        let mut tasks: Vec<Task> = t
            .tasks
            .values()
            .filter(|task| t.task_visible(scope, task))
            .cloned()
            .collect();
        newest_first(&mut tasks, |task| (task.created_at, task.id));
        Ok(tasks)
    }

    async fn advance_task(&self, id: DbId, progress: &TaskProgress) -> StoreResult<Option<Task>> {
        let mut t = self.tables.write().await;
        let Some(task) = t.tasks.get_mut(&id).filter(|task| task.status == progress.from) else {
            return Ok(None);
        };
        task.status = progress.to;
        if progress.to == TaskStatus::Completed {
            task.submitted_at = Some(Utc::now());
            task.submission = progress.submission.clone().map(Json);
        }
        Ok(Some(task.clone()))
    }

    async fn review_task(&self, id: DbId, decision: ApprovalStatus) -> StoreResult<Option<Task>> {
        let mut t = self.tables.write().await;
        let Some(task) = t.tasks.get_mut(&id).filter(|task| {
            task.status == TaskStatus::Completed && task.approval_status == ApprovalStatus::Pending
        }) else {
            return Ok(None);
        };
        task.approval_status = decision;
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl LeaveStore for MemoryStore {
    async fn create_leave(&self, input: &CreateLeave) -> StoreResult<LeaveRequest> {
        let mut t = self.tables.write().await;
        let leave = LeaveRequest {
            id: t.next_id(),
            employee_id: input.employee_id,
            employee_name: input.employee_name.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            reason: input.reason.clone(),
            status: LeaveStatus::Pending,
            applied_to: input.applied_to,
            responded_at: None,
            created_at: Utc::now(),
        };
        t.leaves.insert(leave.id, leave.clone());
        Ok(leave)
    }

    async fn find_leave(&self, id: DbId) -> StoreResult<Option<LeaveRequest>> {
        Ok(self.tables.read().await.leaves.get(&id).cloned())
    }

    async fn list_leaves(&self, scope: Scope) -> StoreResult<Vec<LeaveRequest>> {
        let t = self.tables.read().await;
        let mut leaves: Vec<LeaveRequest> = t
            .leaves
            .values()
            .filter(|leave| t.leave_visible(scope, leave))
            .cloned()
            .collect();
        newest_first(&mut leaves, |leave| (leave.created_at, leave.id));
        Ok(leaves)
    }

    async fn decide_leave(
        &self,
        id: DbId,
        decision: LeaveStatus,
    ) -> StoreResult<Option<LeaveRequest>> {
        let mut t = self.tables.write().await;
        let Some(leave) = t
            .leaves
            .get_mut(&id)
            .filter(|leave| leave.status == LeaveStatus::Pending)
        else {
            return Ok(None);
        };
        leave.status = decision;
        leave.responded_at = Some(Utc::now());
        Ok(Some(leave.clone()))
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn create_attendance(&self, input: &CreateAttendance) -> StoreResult<Attendance> {
        let mut t = self.tables.write().await;
        if t
            .attendance
            .values()
            .any(|a| a.employee_id == input.employee_id && a.date == input.date)
        {
            return Err(StoreError::UniqueViolation(UQ_ATTENDANCE_DAY.to_string()));
        }
        let mark = Attendance {
            id: t.next_id(),
            employee_id: input.employee_id,
            date: input.date,
            status: input.status,
            check_in_time: input.check_in_time,
            marked_by: input.marked_by,
            created_at: Utc::now(),
        };
        t.attendance.insert(mark.id, mark.clone());
        Ok(mark)
    }

    async fn list_attendance(
        &self,
        scope: Scope,
        date: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>> {
        let t = self.tables.read().await;
        let mut marks: Vec<Attendance> = t
            .attendance
            .values()
            .filter(|a| date.is_none_or(|d| a.date == d))
            .filter(|a| t.attendance_visible(scope, a))
            .cloned()
            .collect();
        marks.sort_by(|a, b| (b.date, b.created_at, b.id).cmp(&(a.date, a.created_at, a.id)));
        Ok(marks)
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn create_meeting(&self, input: &CreateMeeting) -> StoreResult<Meeting> {
        let mut t = self.tables.write().await;
        if t.meetings.values().any(|m| m.meeting_link == input.meeting_link) {
            return Err(StoreError::UniqueViolation(UQ_MEETING_LINK.to_string()));
        }
        let meeting = Meeting {
            id: t.next_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            scheduled_by: input.scheduled_by,
            attendees: input.attendees.clone(),
            date_time: input.date_time,
            duration_mins: input.duration_mins,
            meeting_link: input.meeting_link.clone(),
            status: MeetingStatus::Scheduled,
            created_at: Utc::now(),
        };
        t.meetings.insert(meeting.id, meeting.clone());
        Ok(meeting)
    }

    async fn find_meeting(&self, id: DbId) -> StoreResult<Option<Meeting>> {
        Ok(self.tables.read().await.meetings.get(&id).cloned())
    }

    async fn list_meetings(&self, scope: Scope) -> StoreResult<Vec<Meeting>> {
        let t = self.tables.read().await;
        let mut meetings: Vec<Meeting> = t
            .meetings
            .values()
            .filter(|m| meeting_visible(scope, m))
            .cloned()
            .collect();
        newest_first(&mut meetings, |m| (m.created_at, m.id));
        Ok(meetings)
    }

    async fn set_meeting_status(
        &self,
        id: DbId,
        from: MeetingStatus,
        to: MeetingStatus,
    ) -> StoreResult<Option<Meeting>> {
        let mut t = self.tables.write().await;
        let Some(meeting) = t.meetings.get_mut(&id).filter(|m| m.status == from) else {
            return Ok(None);
        };
        meeting.status = to;
        Ok(Some(meeting.clone()))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification> {
        let mut t = self.tables.write().await;
        let notification = Notification {
            id: t.next_id(),
            user_id: input.user_id,
            title: input.draft.title.clone(),
            message: input.draft.message.clone(),
            notification_type: input.draft.kind,
            target_id: input.draft.target_id,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        t.notifications.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: DbId,
        unread_only: bool,
    ) -> StoreResult<Vec<Notification>> {
        let t = self.tables.read().await;
        let mut items: Vec<Notification> = t
            .notifications
            .values()
            .filter(|n| n.user_id == user_id && !(unread_only && n.is_read))
            .cloned()
            .collect();
        newest_first(&mut items, |n| (n.created_at, n.id));
        Ok(items)
    }

    async fn mark_notification_read(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> StoreResult<Option<Notification>> {
        let mut t = self.tables.write().await;
        let Some(n) = t.notifications.get_mut(&id).filter(|n| n.user_id == user_id) else {
            return Ok(None);
        };
        n.is_read = true;
        n.read_at.get_or_insert_with(Utc::now);
        Ok(Some(n.clone()))
    }

    async fn mark_all_notifications_read(&self, user_id: DbId) -> StoreResult<u64> {
        let mut t = self.tables.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for n in t
            .notifications
            .values_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            n.is_read = true;
            n.read_at = Some(now);
            changed += 1;
        }
        Ok(changed)
    }

    async fn unread_notification_count(&self, user_id: DbId) -> StoreResult<i64> {
        let t = self.tables.read().await;
        let count = t
            .notifications
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn create_message(&self, input: &CreateMessage) -> StoreResult<Message> {
        let mut t = self.tables.write().await;
        let message = Message {
            id: t.next_id(),
            sender_id: input.sender_id,
            receiver_id: input.receiver_id,
            content: input.content.clone(),
            message_type: input.message_type,
            media_url: input.media_url.clone(),
            is_read: false,
            created_at: Utc::now(),
        };
        t.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn conversation(&self, a: DbId, b: DbId) -> StoreResult<Vec<Message>> {
        let t = self.tables.read().await;
        let mut items: Vec<Message> = t
            .messages
            .values()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b) || (m.sender_id == b && m.receiver_id == a)
            })
            .cloned()
            .collect();
        items.sort_by_key(|m| (m.created_at, m.id));
        Ok(items)
    }

    async fn mark_message_read(
        &self,
        id: DbId,
        receiver_id: DbId,
    ) -> StoreResult<Option<Message>> {
        let mut t = self.tables.write().await;
        let Some(m) = t.messages.get_mut(&id).filter(|m| m.receiver_id == receiver_id) else {
            return Ok(None);
        };
        m.is_read = true;
        Ok(Some(m.clone()))
    }

    async fn unread_message_count(&self, receiver_id: DbId) -> StoreResult<i64> {
        let t = self.tables.read().await;
        let count = t
            .messages
            .values()
            .filter(|m| m.receiver_id == receiver_id && !m.is_read)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
