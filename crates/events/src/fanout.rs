//! Notification fanout.
//!
//! Runs in-line after a primary write has committed. The notification
//! insert and the socket push are side effects: their failures are logged
//! and never undo or fail the primary write.

use std::sync::Arc;

use hrflow_core::notification::NotificationDraft;
use hrflow_core::records::{MessageRecord, NotificationRecord};
use hrflow_core::types::DbId;
use hrflow_db::models::{CreateMessage, CreateNotification};
use hrflow_db::store::{MessageStore, NotificationStore};
use hrflow_db::StoreResult;

use crate::broker::RoomBroker;
use crate::wire::ServerEvent;

/// Stores notifications and pushes them (and chat messages) to rooms.
pub struct Fanout<S: ?Sized> {
    store: Arc<S>,
    broker: Arc<dyn RoomBroker>,
}

impl<S: ?Sized> Clone for Fanout<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            broker: Arc::clone(&self.broker),
        }
    }
}

impl<S> Fanout<S>
where
    S: NotificationStore + MessageStore + ?Sized,
{
    pub fn new(store: Arc<S>, broker: Arc<dyn RoomBroker>) -> Self {
        Self { store, broker }
    }

    /// Store a notification for `recipient` and push it to their room.
    ///
    /// Returns `None` when the insert failed; the error is logged.
    pub async fn notify(
        &self,
        recipient: DbId,
        draft: NotificationDraft,
    ) -> Option<NotificationRecord> {
        let kind = draft.kind;
        let input = CreateNotification {
            user_id: recipient,
            draft,
        };
        match self.store.create_notification(&input).await {
            Ok(row) => {
                let record = NotificationRecord::from(row);
                self.push(recipient, ServerEvent::NewNotification(record.clone()))
                    .await;
                Some(record)
            }
            Err(e) => {
                tracing::error!(
                    user_id = recipient,
                    kind = %kind,
                    error = %e,
                    "Failed to create notification"
                );
                None
            }
        }
    }

    /// Notify every recipient with the same draft.
    ///
    /// One failed recipient does not stop the others. Returns how many
    /// notifications were stored.
    pub async fn notify_many(&self, recipients: &[DbId], draft: &NotificationDraft) -> usize {
        let mut stored = 0;
        for &recipient in recipients {
            if self.notify(recipient, draft.clone()).await.is_some() {
                stored += 1;
            }
        }
        if stored < recipients.len() {
            tracing::warn!(
                stored,
                total = recipients.len(),
                "Some notifications could not be stored"
            );
        }
        stored
    }

    /// Persist a direct message, then push it and a notification to the
    /// receiver.
    ///
    /// Only the message insert can fail this call.
    pub async fn deliver_message(
        &self,
        input: &CreateMessage,
        sender_name: &str,
    ) -> StoreResult<MessageRecord> {
        let row = self.store.create_message(input).await?;
        let record = MessageRecord::from(row);
        tracing::debug!(
            message_id = record.id,
            sender_id = record.sender_id,
            receiver_id = record.receiver_id,
            "Message stored"
        );

        self.push(record.receiver_id, ServerEvent::ReceiveMessage(record.clone()))
            .await;
        self.notify(
            record.receiver_id,
            NotificationDraft::message_received(record.sender_id, sender_name),
        )
        .await;
        Ok(record)
    }

    async fn push(&self, user_id: DbId, event: ServerEvent) {
        let reached = self.broker.push(user_id, &event).await;
        if reached == 0 {
            tracing::debug!(user_id, event = event.name(), "Recipient offline, push skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use hrflow_core::message::MessageType;
    use hrflow_core::notification::NotificationKind;
    use hrflow_db::models::{Message, Notification};
    use hrflow_db::store::NotificationStore;
    use hrflow_db::{MemoryStore, StoreError};

    use super::*;

    #[derive(Default)]
    struct RecordingBroker {
        pushed: Mutex<Vec<(DbId, ServerEvent)>>,
    }

    #[async_trait]
    impl RoomBroker for RecordingBroker {
        async fn push(&self, user_id: DbId, event: &ServerEvent) -> usize {
            self.pushed.lock().unwrap().push((user_id, event.clone()));
            1
        }
    }

    /// Rejects notifications for one user; everything else delegates.
    struct FlakyStore {
        inner: MemoryStore,
        broken_user: DbId,
    }

    #[async_trait]
    impl NotificationStore for FlakyStore {
        async fn create_notification(
            &self,
            input: &CreateNotification,
        ) -> StoreResult<Notification> {
            if input.user_id == self.broken_user {
                return Err(StoreError::Backend("disk full".into()));
            }
            self.inner.create_notification(input).await
        }

        async fn list_notifications(
            &self,
            user_id: DbId,
            unread_only: bool,
        ) -> StoreResult<Vec<Notification>> {
            self.inner.list_notifications(user_id, unread_only).await
        }

        async fn mark_notification_read(
            &self,
            id: DbId,
            user_id: DbId,
        ) -> StoreResult<Option<Notification>> {
            self.inner.mark_notification_read(id, user_id).await
        }

        async fn mark_all_notifications_read(&self, user_id: DbId) -> StoreResult<u64> {
            self.inner.mark_all_notifications_read(user_id).await
        }

        async fn unread_notification_count(&self, user_id: DbId) -> StoreResult<i64> {
            self.inner.unread_notification_count(user_id).await
        }
    }

    #[async_trait]
    impl MessageStore for FlakyStore {
        async fn create_message(&self, input: &CreateMessage) -> StoreResult<Message> {
            self.inner.create_message(input).await
        }

        async fn conversation(&self, a: DbId, b: DbId) -> StoreResult<Vec<Message>> {
            self.inner.conversation(a, b).await
        }

        async fn mark_message_read(
            &self,
            id: DbId,
            receiver_id: DbId,
        ) -> StoreResult<Option<Message>> {
            self.inner.mark_message_read(id, receiver_id).await
        }

        async fn unread_message_count(&self, receiver_id: DbId) -> StoreResult<i64> {
            self.inner.unread_message_count(receiver_id).await
        }
    }

    fn draft() -> NotificationDraft {
        NotificationDraft::new(NotificationKind::Meeting, "Standup", "Daily standup", Some(1))
    }

    #[tokio::test]
    async fn notify_stores_and_pushes() {
        let store = Arc::new(MemoryStore::new());
        let broker = Arc::new(RecordingBroker::default());
        let fanout = Fanout::new(Arc::clone(&store), broker.clone() as Arc<dyn RoomBroker>);

        let record = fanout.notify(5, draft()).await.unwrap();
        assert_eq!(record.user_id, 5);
        assert!(!record.read);

        let pushed = broker.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].0, 5);
        assert_eq!(pushed[0].1, ServerEvent::NewNotification(record));
    }

    #[tokio::test]
    async fn one_failed_recipient_does_not_stop_the_rest() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            broken_user: 2,
        });
        let broker = Arc::new(RecordingBroker::default());
        let fanout = Fanout::new(Arc::clone(&store), broker.clone() as Arc<dyn RoomBroker>);

        let stored = fanout.notify_many(&[1, 2, 3], &draft()).await;
        assert_eq!(stored, 2);
        assert_eq!(store.unread_notification_count(1).await.unwrap(), 1);
        assert_eq!(store.unread_notification_count(3).await.unwrap(), 1);

        let pushed: Vec<DbId> = broker.pushed.lock().unwrap().iter().map(|p| p.0).collect();
        assert_eq!(pushed, [1, 3]);
    }

    #[tokio::test]
    async fn message_survives_a_failed_notification() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            broken_user: 8,
        });
        let broker = Arc::new(RecordingBroker::default());
        let fanout = Fanout::new(Arc::clone(&store), broker.clone() as Arc<dyn RoomBroker>);

        let record = fanout
            .deliver_message(
                &CreateMessage {
                    sender_id: 4,
                    receiver_id: 8,
                    content: "Welcome aboard".into(),
                    message_type: MessageType::Text,
                    media_url: None,
                },
                "Hana",
            )
            .await
            .unwrap();
        assert_eq!(record.receiver_id, 8);
        assert_eq!(store.conversation(4, 8).await.unwrap().len(), 1);

        let pushed = broker.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].1.name(), "receive_message");
    }
}
