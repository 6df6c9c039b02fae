//! Notification kinds and the message templates used by the fanout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::leave::LeaveStatus;
use crate::task::ApprovalStatus;
use crate::types::{string_enum, DbId, Timestamp};

string_enum! {
    pub enum NotificationKind {
        Task => "task",
        Leave => "leave",
        Meeting => "meeting",
        General => "general",
    }
}

/// A notification that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Id of the entity that triggered the notification.
    pub target_id: Option<DbId>,
}

impl NotificationDraft {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        target_id: Option<DbId>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            target_id,
        }
    }

    pub fn task_assigned(task_id: DbId, task_title: &str, assigner_name: &str) -> Self {
        Self::new(
            NotificationKind::Task,
            "New task assigned",
            format!("{assigner_name} assigned you the task \"{task_title}\""),
            Some(task_id),
        )
    }

    pub fn task_completed(task_id: DbId, task_title: &str, assignee_name: &str) -> Self {
        Self::new(
            NotificationKind::Task,
            "Task completed",
            format!("{assignee_name} completed the task \"{task_title}\""),
            Some(task_id),
        )
    }

    pub fn task_reviewed(task_id: DbId, task_title: &str, decision: ApprovalStatus) -> Self {
        Self::new(
            NotificationKind::Task,
            format!("Task {decision}"),
            format!("Your submission for \"{task_title}\" was {decision}"),
            Some(task_id),
        )
    }

    pub fn leave_applied(
        leave_id: DbId,
        requester_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self::new(
            NotificationKind::Leave,
            "New leave request",
            format!("{requester_name} requested leave from {start} to {end}"),
            Some(leave_id),
        )
    }

    pub fn leave_decided(
        leave_id: DbId,
        decision: LeaveStatus,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self::new(
            NotificationKind::Leave,
            format!("Leave {decision}"),
            format!("Your leave from {start} to {end} was {decision}"),
            Some(leave_id),
        )
    }

    pub fn meeting_scheduled(
        meeting_id: DbId,
        meeting_title: &str,
        date_time: Timestamp,
        scheduler_name: &str,
    ) -> Self {
        Self::new(
            NotificationKind::Meeting,
            "Meeting scheduled",
            format!(
                "{scheduler_name} invited you to \"{meeting_title}\" at {}",
                date_time.format("%Y-%m-%d %H:%M UTC")
            ),
            Some(meeting_id),
        )
    }

    /// `target_id` is the sender so the client can open the conversation.
    pub fn message_received(sender_id: DbId, sender_name: &str) -> Self {
        Self::new(
            NotificationKind::General,
            "New message",
            format!("You have a new message from {sender_name}"),
            Some(sender_id),
        )
    }
}
