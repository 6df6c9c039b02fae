//! Attendance entity model and DTOs.

use chrono::NaiveDate;
use hrflow_core::attendance::AttendanceStatus;
use hrflow_core::records::{AttendanceRecord, UserRef};
use hrflow_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `attendance` table. Rows are never updated.
#[derive(Debug, Clone, FromRow)]
pub struct Attendance {
    pub id: DbId,
    pub employee_id: DbId,
    pub date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
    pub check_in_time: Option<Timestamp>,
    pub marked_by: DbId,
    pub created_at: Timestamp,
}

impl Attendance {
    pub fn into_record(self, user: impl Fn(DbId) -> UserRef) -> AttendanceRecord {
        AttendanceRecord {
            id: self.id,
            employee_id: user(self.employee_id),
            date: self.date,
            status: self.status,
            check_in_time: self.check_in_time,
            marked_by: user(self.marked_by),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAttendance {
    pub employee_id: DbId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in_time: Option<Timestamp>,
    pub marked_by: DbId,
}
