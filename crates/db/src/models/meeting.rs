//! Meeting entity model and DTOs.

use hrflow_core::meeting::{end_time, MeetingStatus};
use hrflow_core::records::{MeetingRecord, UserRef};
use hrflow_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `meetings` table.
#[derive(Debug, Clone, FromRow)]
pub struct Meeting {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub scheduled_by: DbId,
    pub attendees: Vec<DbId>,
    pub date_time: Timestamp,
    pub duration_mins: i32,
    pub meeting_link: String,
    #[sqlx(try_from = "String")]
    pub status: MeetingStatus,
    pub created_at: Timestamp,
}

impl Meeting {
    pub fn involves(&self, user_id: DbId) -> bool {
        self.scheduled_by == user_id || self.attendees.contains(&user_id)
    }

    pub fn into_record(self, user: impl Fn(DbId) -> UserRef) -> MeetingRecord {
        MeetingRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            scheduled_by: user(self.scheduled_by),
            attendees: self.attendees.iter().map(|id| user(*id)).collect(),
            end_time: end_time(self.date_time, self.duration_mins),
            date_time: self.date_time,
            duration: self.duration_mins,
            meeting_link: self.meeting_link,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// DTO for scheduling a meeting. Attendees are fixed at creation.
#[derive(Debug, Clone)]
pub struct CreateMeeting {
    pub title: String,
    pub description: String,
    pub scheduled_by: DbId,
    pub attendees: Vec<DbId>,
    pub date_time: Timestamp,
    pub duration_mins: i32,
    pub meeting_link: String,
}
