//! Notification entity model.

use hrflow_core::notification::{NotificationDraft, NotificationKind};
use hrflow_core::records::NotificationRecord;
use hrflow_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// `read_at` is set exactly when `is_read` is true (enforced by a CHECK
/// constraint).
#[derive(Debug, Clone, FromRow)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub notification_type: NotificationKind,
    pub target_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<Notification> for NotificationRecord {
    fn from(n: Notification) -> Self {
        NotificationRecord {
            id: n.id,
            user_id: n.user_id,
            title: n.title,
            message: n.message,
            kind: n.notification_type,
            target_id: n.target_id,
            read: n.is_read,
            read_at: n.read_at,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub draft: NotificationDraft,
}
