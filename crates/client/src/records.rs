//! Operational records the dashboards render: tasks, leaves, attendance,
//! meetings and notifications.
//!
//! Everything is bulk-fetched on start and then on a fixed interval (see
//! [`RecordsContext::spawn_polling`]). Successful mutations patch the local
//! copy right away so the UI does not wait for the next poll. All `*_of` /
//! `*_for` accessors are pure filters over what was fetched.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use hrflow_core::leave::LeaveStatus;
use hrflow_core::meeting::MeetingStatus;
use hrflow_core::records::{
    AttendanceRecord, LeaveRecord, MeetingRecord, NotificationRecord, TaskRecord, UserRef,
};
use hrflow_core::reference::Ref;
use hrflow_core::task::{ApprovalStatus, TaskStatus};
use hrflow_core::types::{DbId, Timestamp};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::HrApi;
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::error::ClientResult;
use crate::requests::{NewAttendance, NewLeave, NewMeeting, NewTask, TaskProgress};

pub struct RecordsContext<A: HrApi> {
    api: Arc<A>,
    tasks: Vec<TaskRecord>,
    leaves: Vec<LeaveRecord>,
    attendance: Vec<AttendanceRecord>,
    meetings: Vec<MeetingRecord>,
    notifications: Vec<NotificationRecord>,
    last_refreshed: Option<Timestamp>,
}

impl<A: HrApi> RecordsContext<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            leaves: Vec::new(),
            attendance: Vec::new(),
            meetings: Vec::new(),
            notifications: Vec::new(),
            last_refreshed: None,
        }
    }

    /// Refetch every collection. Nothing is replaced unless all five
    /// requests succeed.
    pub async fn refresh_all(&mut self) -> ClientResult<()> {
        let result = fetch_all(self.api.as_ref()).await;
        self.apply(result)
    }

    fn apply(&mut self, result: ClientResult<Snapshot>) -> ClientResult<()> {
        let snapshot = self.guard(result)?;
        self.tasks = snapshot.tasks;
        self.leaves = snapshot.leaves;
        self.attendance = snapshot.attendance;
        self.meetings = snapshot.meetings;
        self.notifications = snapshot.notifications;
        self.last_refreshed = Some(Utc::now());
        Ok(())
    }

    /// Drop every cached record, e.g. on logout.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.leaves.clear();
        self.attendance.clear();
        self.meetings.clear();
        self.notifications.clear();
        self.last_refreshed = None;
    }

    fn guard<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            if e.is_unauthenticated() {
                self.clear();
            }
        }
        result
    }

    pub fn last_refreshed(&self) -> Option<Timestamp> {
        self.last_refreshed
    }

    // ========== Mutations ==========

    pub async fn create_task(&mut self, input: &NewTask) -> ClientResult<TaskRecord> {
        let result = self.api.create_task(input).await;
        let task = self.guard(result)?;
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    pub async fn update_task_status(
        &mut self,
        id: DbId,
        input: &TaskProgress,
    ) -> ClientResult<TaskRecord> {
        let result = self.api.update_task_status(id, input).await;
        let task = self.guard(result)?;
        self.patch_task(task.clone());
        Ok(task)
    }

    pub async fn review_task(
        &mut self,
        id: DbId,
        decision: ApprovalStatus,
    ) -> ClientResult<TaskRecord> {
        let result = self.api.review_task(id, decision).await;
        let task = self.guard(result)?;
        self.patch_task(task.clone());
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: DbId) -> ClientResult<()> {
        let result = self.api.delete_task(id).await;
        self.guard(result)?;
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }

    pub async fn apply_leave(&mut self, input: &NewLeave) -> ClientResult<LeaveRecord> {
        let result = self.api.apply_leave(input).await;
        let leave = self.guard(result)?;
        self.leaves.insert(0, leave.clone());
        Ok(leave)
    }

    pub async fn decide_leave(
        &mut self,
        id: DbId,
        status: LeaveStatus,
    ) -> ClientResult<LeaveRecord> {
        let result = self.api.decide_leave(id, status).await;
        let mut leave = self.guard(result)?;
        match self.leaves.iter_mut().find(|l| l.id == id) {
            Some(existing) => {
                keep_populated(&mut leave.employee_id, &existing.employee_id);
                keep_populated(&mut leave.applied_to, &existing.applied_to);
                *existing = leave.clone();
            }
            None => self.leaves.insert(0, leave.clone()),
        }
        Ok(leave)
    }

    pub async fn mark_attendance(
        &mut self,
        input: &NewAttendance,
    ) -> ClientResult<AttendanceRecord> {
        let result = self.api.mark_attendance(input).await;
        let mark = self.guard(result)?;
        self.attendance.insert(0, mark.clone());
        Ok(mark)
    }

    pub async fn schedule_meeting(&mut self, input: &NewMeeting) -> ClientResult<MeetingRecord> {
        let result = self.api.schedule_meeting(input).await;
        let meeting = self.guard(result)?;
        self.meetings.insert(0, meeting.clone());
        Ok(meeting)
    }

    pub async fn update_meeting_status(
        &mut self,
        id: DbId,
        status: MeetingStatus,
    ) -> ClientResult<MeetingRecord> {
        let result = self.api.update_meeting_status(id, status).await;
        let mut meeting = self.guard(result)?;
        match self.meetings.iter_mut().find(|m| m.id == id) {
            Some(existing) => {
                keep_populated(&mut meeting.scheduled_by, &existing.scheduled_by);
                for attendee in &mut meeting.attendees {
                    if let Some(old) = existing.attendees.iter().find(|a| a.id() == attendee.id()) {
                        keep_populated(attendee, old);
                    }
                }
                *existing = meeting.clone();
            }
            None => self.meetings.insert(0, meeting.clone()),
        }
        Ok(meeting)
    }

    pub async fn mark_notification_read(&mut self, id: DbId) -> ClientResult<NotificationRecord> {
        let result = self.api.mark_notification_read(id).await;
        let note = self.guard(result)?;
        self.merge_notification(note.clone());
        Ok(note)
    }

    pub async fn mark_all_notifications_read(&mut self) -> ClientResult<u64> {
        let result = self.api.mark_all_notifications_read().await;
        let marked = self.guard(result)?;
        let now = Utc::now();
        for note in self.notifications.iter_mut().filter(|n| !n.read) {
            note.read = true;
            if note.read_at.is_none() {
                note.read_at = Some(now);
            }
        }
        Ok(marked)
    }

    /// Fold in a notification pushed over the socket (or returned by a
    /// mutation). Known ids are replaced in place; new ones go on top.
    pub fn merge_notification(&mut self, note: NotificationRecord) {
        match self.notifications.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => self.notifications.insert(0, note),
        }
    }

    fn patch_task(&mut self, mut task: TaskRecord) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                keep_populated(&mut task.assigned_to, &existing.assigned_to);
                keep_populated(&mut task.assigned_by, &existing.assigned_by);
                *existing = task;
            }
            None => self.tasks.insert(0, task),
        }
    }

    // ========== Views ==========

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn leaves(&self) -> &[LeaveRecord] {
        &self.leaves
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn meetings(&self) -> &[MeetingRecord] {
        &self.meetings
    }

    pub fn notifications(&self) -> &[NotificationRecord] {
        &self.notifications
    }

    pub fn task(&self, id: DbId) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks_assigned_to(&self, user_id: DbId) -> impl Iterator<Item = &TaskRecord> + '_ {
        self.tasks
            .iter()
            .filter(move |t| t.assigned_to.id() == user_id)
    }

    pub fn tasks_assigned_by(&self, user_id: DbId) -> impl Iterator<Item = &TaskRecord> + '_ {
        self.tasks
            .iter()
            .filter(move |t| t.assigned_by.id() == user_id)
    }

    /// Completed tasks `reviewer_id` assigned that still need a decision.
    pub fn tasks_awaiting_review(
        &self,
        reviewer_id: DbId,
    ) -> impl Iterator<Item = &TaskRecord> + '_ {
        self.tasks_assigned_by(reviewer_id).filter(|t| {
            t.status == TaskStatus::Completed && t.approval_status == ApprovalStatus::Pending
        })
    }

    pub fn leaves_of(&self, employee_id: DbId) -> impl Iterator<Item = &LeaveRecord> + '_ {
        self.leaves
            .iter()
            .filter(move |l| l.employee_id.id() == employee_id)
    }

    /// Pending requests addressed to `approver_id`.
    pub fn leaves_awaiting(&self, approver_id: DbId) -> impl Iterator<Item = &LeaveRecord> + '_ {
        self.leaves.iter().filter(move |l| {
            l.applied_to.id() == approver_id && l.status == LeaveStatus::Pending
        })
    }

    pub fn attendance_of(
        &self,
        employee_id: DbId,
    ) -> impl Iterator<Item = &AttendanceRecord> + '_ {
        self.attendance
            .iter()
            .filter(move |a| a.employee_id.id() == employee_id)
    }

    pub fn attendance_on(&self, date: NaiveDate) -> impl Iterator<Item = &AttendanceRecord> + '_ {
        self.attendance.iter().filter(move |a| a.date == date)
    }

    /// Meetings `user_id` organised or was invited to.
    pub fn meetings_for(&self, user_id: DbId) -> impl Iterator<Item = &MeetingRecord> + '_ {
        self.meetings.iter().filter(move |m| {
            m.scheduled_by.id() == user_id || m.attendees.iter().any(|a| a.id() == user_id)
        })
    }

    /// Scheduled meetings for `user_id` starting after `now`, soonest first.
    pub fn upcoming_meetings(&self, user_id: DbId, now: Timestamp) -> Vec<&MeetingRecord> {
        let mut upcoming: Vec<&MeetingRecord> = self
            .meetings_for(user_id)
            .filter(|m| m.status == MeetingStatus::Scheduled && m.date_time > now)
            .collect();
        upcoming.sort_by_key(|m| m.date_time);
        upcoming
    }

    pub fn unread_notifications(&self) -> impl Iterator<Item = &NotificationRecord> + '_ {
        self.notifications.iter().filter(|n| !n.read)
    }

    pub fn unread_count(&self) -> usize {
        self.unread_notifications().count()
    }
}

impl<A: HrApi + 'static> RecordsContext<A> {
    /// Refetch every `every` (default [`DEFAULT_POLL_INTERVAL`]) until
    /// `cancel` fires or the session is rejected. The first refresh runs
    /// immediately.
    ///
    /// Requests run without holding `ctx`; the lock is taken only to swap
    /// in the results.
    pub fn spawn_polling(
        ctx: Arc<Mutex<Self>>,
        every: Option<Duration>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let api = Arc::clone(&ctx.lock().await.api);
            let mut ticker = tokio::time::interval(every.unwrap_or(DEFAULT_POLL_INTERVAL));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let fetched = fetch_all(api.as_ref()).await;
                        let outcome = ctx.lock().await.apply(fetched);
                        match outcome {
                            Ok(()) => {}
                            Err(e) if e.is_unauthenticated() => {
                                tracing::info!("Session ended, stopping record polling");
                                break;
                            }
                            Err(e) => tracing::warn!(error = %e, "Record refresh failed"),
                        }
                    }
                }
            }
        })
    }
}

struct Snapshot {
    tasks: Vec<TaskRecord>,
    leaves: Vec<LeaveRecord>,
    attendance: Vec<AttendanceRecord>,
    meetings: Vec<MeetingRecord>,
    notifications: Vec<NotificationRecord>,
}

async fn fetch_all<A: HrApi + ?Sized>(api: &A) -> ClientResult<Snapshot> {
    let (tasks, leaves, attendance, meetings, notifications) = tokio::try_join!(
        api.list_tasks(),
        api.list_leaves(),
        api.list_attendance(None),
        api.list_meetings(),
        api.list_notifications(),
    )?;
    Ok(Snapshot {
        tasks,
        leaves,
        attendance,
        meetings,
        notifications,
    })
}

/// Mutation responses carry bare ids; keep the populated reference we
/// already had for the same user.
fn keep_populated(new: &mut UserRef, old: &UserRef) {
    if matches!(new, Ref::Id(_)) && old.populated().is_some() && new.id() == old.id() {
        *new = old.clone();
    }
}
