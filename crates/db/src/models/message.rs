//! Direct message entity model.

use hrflow_core::message::MessageType;
use hrflow_core::records::MessageRecord;
use hrflow_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub message_type: MessageType,
    pub media_url: Option<String>,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl From<Message> for MessageRecord {
    fn from(m: Message) -> Self {
        MessageRecord {
            id: m.id,
            sender_id: m.sender_id,
            receiver_id: m.receiver_id,
            content: m.content,
            kind: m.message_type,
            media_url: m.media_url,
            read: m.is_read,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub content: String,
    pub message_type: MessageType,
    pub media_url: Option<String>,
}
