//! Repository for the `notifications` table.

use hrflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, title, message, notification_type, target_id, is_read, \
                       read_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, title, message, notification_type, target_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(&input.draft.title)
            .bind(&input.draft.message)
            .bind(input.draft.kind.as_str())
            .bind(input.draft.target_id)
            .fetch_one(pool)
            .await
    }

    /// List notifications for a user, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with `is_read = false`
    /// are returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read, keeping an existing `read_at`.
    ///
    /// Returns `None` if the notification does not belong to the user.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = true, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
