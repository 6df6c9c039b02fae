//! Repository for the `leave_requests` table.

use hrflow_core::leave::LeaveStatus;
use hrflow_core::policy::Scope;
use hrflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::leave::{CreateLeave, LeaveRequest};
use crate::repositories::ScopeFilter;

/// Column list for `leave_requests` queries.
const COLUMNS: &str = "id, employee_id, employee_name, start_date, end_date, reason, status, \
                       applied_to, responded_at, created_at";

/// Provides CRUD operations for leave requests.
pub struct LeaveRepo;

impl LeaveRepo {
    pub async fn create(pool: &PgPool, input: &CreateLeave) -> Result<LeaveRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO leave_requests \
                (employee_id, employee_name, start_date, end_date, reason, applied_to) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(input.employee_id)
            .bind(&input.employee_name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.reason)
            .bind(input.applied_to)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LeaveRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leave_requests WHERE id = $1");
        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List leave requests visible under `scope`, newest first.
    pub async fn list(pool: &PgPool, scope: Scope) -> Result<Vec<LeaveRequest>, sqlx::Error> {
        let filter = ScopeFilter::new(
            scope,
            "employee_id = $1",
            "employee_id = $1 OR applied_to = $1",
            "employee_id = $1 OR applied_to = $1 \
             OR employee_id IN (SELECT id FROM users WHERE created_by = $1)",
        );
        let query = format!(
            "SELECT {COLUMNS} FROM leave_requests WHERE {} ORDER BY created_at DESC, id DESC",
            filter.clause
        );
        let mut q = sqlx::query_as::<_, LeaveRequest>(&query);
        if let Some(id) = filter.bind {
            q = q.bind(id);
        }
        q.fetch_all(pool).await
    }

    /// Decide a pending request. Returns `None` if it was already decided.
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        decision: LeaveStatus,
    ) -> Result<Option<LeaveRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE leave_requests SET status = $2, responded_at = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(id)
            .bind(decision.as_str())
            .fetch_optional(pool)
            .await
    }
}
