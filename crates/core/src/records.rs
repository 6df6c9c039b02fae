//! Wire shapes of the records the REST API returns.
//!
//! The server serializes these and the client deserializes them, so both
//! sides agree on field names (camelCase) and on which foreign keys are
//! [`Ref`]s.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceStatus;
use crate::leave::LeaveStatus;
use crate::meeting::MeetingStatus;
use crate::message::MessageType;
use crate::notification::NotificationKind;
use crate::policy::Member;
use crate::reference::{Identified, Ref, UserSummary};
use crate::roles::{AccountStatus, Role};
use crate::task::{ApprovalStatus, Priority, TaskStatus};
use crate::types::{DbId, Timestamp};

/// A user reference as it appears on the wire.
pub type UserRef = Ref<UserSummary>;

/// A user account without its secret fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    /// Hidden (`null`) when the viewer does not manage the account.
    pub salary: Option<f64>,
    pub profile_picture: Option<String>,
    pub is_online: bool,
    pub created_by: Option<DbId>,
    pub status: AccountStatus,
    pub created_at: Timestamp,
}

impl PublicUser {
    pub fn member(&self) -> Member {
        Member {
            id: self.id,
            role: self.role,
            created_by: self.created_by,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            profile_picture: self.profile_picture.clone(),
        }
    }
}

impl Identified for PublicUser {
    fn id(&self) -> DbId {
        self.id
    }
}

/// What an assignee hands in when completing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub document_url: String,
    pub document_type: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub assigned_to: UserRef,
    pub assigned_by: UserRef,
    pub status: TaskStatus,
    pub approval_status: ApprovalStatus,
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub allowed_formats: Vec<String>,
    pub submitted_at: Option<Timestamp>,
    pub submission: Option<Submission>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    pub id: DbId,
    pub employee_id: UserRef,
    /// Requester's name when the request was filed.
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub applied_to: UserRef,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: DbId,
    pub employee_id: UserRef,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in_time: Option<Timestamp>,
    pub marked_by: UserRef,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRecord {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub scheduled_by: UserRef,
    pub attendees: Vec<UserRef>,
    pub date_time: Timestamp,
    /// Length in minutes.
    pub duration: i32,
    pub end_time: Timestamp,
    pub meeting_link: String,
    pub status: MeetingStatus,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub target_id: Option<DbId>,
    pub read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub media_url: Option<String>,
    pub read: bool,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_uses_wire_names() {
        let record = NotificationRecord {
            id: 1,
            user_id: 2,
            title: "Leave approved".into(),
            message: "Your leave was approved".into(),
            kind: NotificationKind::Leave,
            target_id: Some(3),
            read: false,
            read_at: None,
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "leave");
        assert_eq!(json["userId"], 2);
        assert_eq!(json["targetId"], 3);
        assert!(json["readAt"].is_null());
    }

    #[test]
    fn task_accepts_bare_and_populated_refs() {
        let json = serde_json::json!({
            "id": 7,
            "title": "Sign contract",
            "description": "",
            "assignedTo": 3,
            "assignedBy": {
                "id": 2,
                "name": "Jane Roe",
                "email": "janeroe@company.com",
                "role": "hr",
                "profilePicture": null
            },
            "status": "in-progress",
            "approvalStatus": "pending",
            "priority": "high",
            "dueDate": null,
            "allowedFormats": ["pdf"],
            "submittedAt": null,
            "submission": null,
            "createdAt": "2025-03-01T09:00:00Z"
        });
        let task: TaskRecord = serde_json::from_value(json).unwrap();
        assert_eq!(task.assigned_to.id(), 3);
        assert_eq!(task.assigned_by.id(), 2);
        assert_eq!(task.status, TaskStatus::InProgress);
    }
}
