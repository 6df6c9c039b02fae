//! Repository for the `messages` table.

use hrflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{CreateMessage, Message};

/// Column list for `messages` queries.
const COLUMNS: &str =
    "id, sender_id, receiver_id, content, message_type, media_url, is_read, created_at";

/// Provides CRUD operations for direct messages.
pub struct MessageRepo;

impl MessageRepo {
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (sender_id, receiver_id, content, message_type, media_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(input.sender_id)
            .bind(input.receiver_id)
            .bind(&input.content)
            .bind(input.message_type.as_str())
            .bind(&input.media_url)
            .fetch_one(pool)
            .await
    }

    /// Both directions of a conversation, oldest first.
    pub async fn conversation(pool: &PgPool, a: DbId, b: DbId) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE (sender_id = $1 AND receiver_id = $2) \
                OR (sender_id = $2 AND receiver_id = $1) \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(a)
            .bind(b)
            .fetch_all(pool)
            .await
    }

    /// Mark a message read. Only the receiver may do so.
    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
        receiver_id: DbId,
    ) -> Result<Option<Message>, sqlx::Error> {
        let query = format!(
            "UPDATE messages SET is_read = true \
             WHERE id = $1 AND receiver_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .bind(receiver_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn unread_count(pool: &PgPool, receiver_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(receiver_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
