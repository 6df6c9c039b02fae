//! Repository for the `meetings` table.

use hrflow_core::meeting::MeetingStatus;
use hrflow_core::policy::Scope;
use hrflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::meeting::{CreateMeeting, Meeting};
use crate::repositories::ScopeFilter;

/// Column list for `meetings` queries.
const COLUMNS: &str = "id, title, description, scheduled_by, attendees, date_time, \
                       duration_mins, meeting_link, status, created_at";

/// Provides CRUD operations for meetings.
pub struct MeetingRepo;

impl MeetingRepo {
    pub async fn create(pool: &PgPool, input: &CreateMeeting) -> Result<Meeting, sqlx::Error> {
        let query = format!(
            "INSERT INTO meetings \
                (title, description, scheduled_by, attendees, date_time, duration_mins, meeting_link) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.scheduled_by)
            .bind(&input.attendees)
            .bind(input.date_time)
            .bind(input.duration_mins)
            .bind(&input.meeting_link)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Meeting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meetings WHERE id = $1");
        sqlx::query_as::<_, Meeting>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List meetings visible under `scope`, newest first.
    pub async fn list(pool: &PgPool, scope: Scope) -> Result<Vec<Meeting>, sqlx::Error> {
        let filter = ScopeFilter::new(
            scope,
            "$1 = ANY(attendees)",
            "scheduled_by = $1 OR $1 = ANY(attendees)",
            "scheduled_by = $1 OR $1 = ANY(attendees)",
        );
        let query = format!(
            "SELECT {COLUMNS} FROM meetings WHERE {} ORDER BY created_at DESC, id DESC",
            filter.clause
        );
        let mut q = sqlx::query_as::<_, Meeting>(&query);
        if let Some(id) = filter.bind {
            q = q.bind(id);
        }
        q.fetch_all(pool).await
    }

    /// Compare-and-set the meeting status.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from: MeetingStatus,
        to: MeetingStatus,
    ) -> Result<Option<Meeting>, sqlx::Error> {
        let query = format!(
            "UPDATE meetings SET status = $2 WHERE id = $1 AND status = $3 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(id)
            .bind(to.as_str())
            .bind(from.as_str())
            .fetch_optional(pool)
            .await
    }
}
