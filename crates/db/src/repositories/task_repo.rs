//! Repository for the `tasks` table.

use hrflow_core::policy::Scope;
use hrflow_core::task::{ApprovalStatus, TaskStatus};
use hrflow_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, TaskProgress};
use crate::repositories::ScopeFilter;

/// Column list for `tasks` queries.
const COLUMNS: &str = "id, title, description, assigned_to, assigned_by, status, \
                       approval_status, priority, due_date, allowed_formats, submitted_at, \
                       submission, created_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, assigned_to, assigned_by, priority, \
                                due_date, allowed_formats) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.assigned_to)
            .bind(input.assigned_by)
            .bind(input.priority.as_str())
            .bind(input.due_date)
            .bind(&input.allowed_formats)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks visible under `scope`, newest first.
    pub async fn list(pool: &PgPool, scope: Scope) -> Result<Vec<Task>, sqlx::Error> {
        let filter = ScopeFilter::new(
            scope,
            "assigned_to = $1",
            "assigned_to = $1 OR assigned_by = $1",
            "assigned_to = $1 OR assigned_by = $1 \
             OR assigned_to IN (SELECT id FROM users WHERE created_by = $1)",
        );
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE {} ORDER BY created_at DESC, id DESC",
            filter.clause
        );
        let mut q = sqlx::query_as::<_, Task>(&query);
        if let Some(id) = filter.bind {
            q = q.bind(id);
        }
        q.fetch_all(pool).await
    }

    /// Compare-and-set the progress status.
    ///
    /// Reaching `completed` stamps `submitted_at` and stores the submission.
    pub async fn advance(
        pool: &PgPool,
        id: DbId,
        progress: &TaskProgress,
    ) -> Result<Option<Task>, sqlx::Error> {
        let completing = progress.to == TaskStatus::Completed;
        let query = format!(
            "UPDATE tasks SET \
                status = $2, \
                submitted_at = CASE WHEN $4 THEN NOW() ELSE submitted_at END, \
                submission = CASE WHEN $4 THEN $5::jsonb ELSE submission END \
             WHERE id = $1 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(progress.to.as_str())
            .bind(progress.from.as_str())
            .bind(completing)
            .bind(progress.submission.clone().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Record an approval decision on a completed, undecided task.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        decision: ApprovalStatus,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET approval_status = $2 \
             WHERE id = $1 AND status = 'completed' AND approval_status = 'pending' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(decision.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
