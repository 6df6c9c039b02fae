//! Leave request entity model and DTOs.

use chrono::NaiveDate;
use hrflow_core::leave::LeaveStatus;
use hrflow_core::records::{LeaveRecord, UserRef};
use hrflow_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `leave_requests` table.
#[derive(Debug, Clone, FromRow)]
pub struct LeaveRequest {
    pub id: DbId,
    pub employee_id: DbId,
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    #[sqlx(try_from = "String")]
    pub status: LeaveStatus,
    pub applied_to: DbId,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl LeaveRequest {
    pub fn into_record(self, user: impl Fn(DbId) -> UserRef) -> LeaveRecord {
        LeaveRecord {
            id: self.id,
            employee_id: user(self.employee_id),
            employee_name: self.employee_name,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            status: self.status,
            applied_to: user(self.applied_to),
            responded_at: self.responded_at,
            created_at: self.created_at,
        }
    }
}

/// DTO for filing a leave request.
#[derive(Debug, Clone)]
pub struct CreateLeave {
    pub employee_id: DbId,
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub applied_to: DbId,
}
