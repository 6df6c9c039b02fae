//! Repository for the `attendance` table.

use chrono::NaiveDate;
use hrflow_core::policy::Scope;
use sqlx::PgPool;

use crate::models::attendance::{Attendance, CreateAttendance};
use crate::repositories::ScopeFilter;

/// Column list for `attendance` queries.
const COLUMNS: &str = "id, employee_id, date, status, check_in_time, marked_by, created_at";

/// Provides insert and list operations for attendance marks.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Insert a mark. The `uq_attendance_employee_date` constraint rejects a
    /// second mark for the same employee and day.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAttendance,
    ) -> Result<Attendance, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance (employee_id, date, status, check_in_time, marked_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(input.employee_id)
            .bind(input.date)
            .bind(input.status.as_str())
            .bind(input.check_in_time)
            .bind(input.marked_by)
            .fetch_one(pool)
            .await
    }

    /// List marks visible under `scope`, optionally for a single day.
    pub async fn list(
        pool: &PgPool,
        scope: Scope,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>, sqlx::Error> {
        let filter = ScopeFilter::new(
            scope,
            "employee_id = $1",
            "employee_id = $1 OR marked_by = $1",
            "employee_id = $1 OR employee_id IN (SELECT id FROM users WHERE created_by = $1)",
        );
        let date_param = filter.next_param();
        let query = format!(
            "SELECT {COLUMNS} FROM attendance \
             WHERE ({}) AND ({date_param}::date IS NULL OR date = {date_param}::date) \
             ORDER BY date DESC, created_at DESC, id DESC",
            filter.clause
        );
        let mut q = sqlx::query_as::<_, Attendance>(&query);
        if let Some(id) = filter.bind {
            q = q.bind(id);
        }
        q.bind(date).fetch_all(pool).await
    }
}
