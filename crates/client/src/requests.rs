//! Request bodies sent to the REST API.

use chrono::NaiveDate;
use hrflow_core::attendance::AttendanceStatus;
use hrflow_core::message::MessageType;
use hrflow_core::records::Submission;
use hrflow_core::roles::{AccountStatus, Role};
use hrflow_core::task::{ApprovalStatus, Priority, TaskStatus};
use hrflow_core::types::{DbId, Timestamp};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    /// Left out to let the server pick the one role the caller may create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl NewUser {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_to: DbId,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
    pub allowed_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskApproval {
    pub approval_status: ApprovalStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeave {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_to: Option<DbId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    pub employee_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    pub title: String,
    pub description: String,
    pub attendees: Vec<DbId>,
    pub date_time: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
}

/// Body for the status-only updates (leave decisions, meeting status).
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusUpdate<S> {
    pub status: S,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: DbId,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub receiver_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl OutgoingMessage {
    pub fn text(receiver_id: DbId, content: impl Into<String>) -> Self {
        Self {
            receiver_id,
            content: Some(content.into()),
            kind: MessageType::Text,
            media_url: None,
        }
    }
}
