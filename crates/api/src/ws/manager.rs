use std::collections::HashMap;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::ws::Message;
use hrflow_core::types::{DbId, Timestamp};
use hrflow_events::{RoomBroker, ServerEvent};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing frames to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// The room this connection listens on. `None` until joined.
    pub user_id: Option<DbId>,
    /// Channel sender for outbound frames to this connection.
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

/// Open sockets keyed by connection id, each tagged with its room.
///
/// Shared (behind `Arc`) by the upgrade handler, the heartbeat and the
/// notification fanout.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection, optionally already in a user's room.
    ///
    /// Returns the receiver half of the frame channel so the caller can
    /// forward frames to the WebSocket sink.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: Option<DbId>,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Move a connection into `user_id`'s room. Returns `false` if the
    /// connection is gone.
    pub async fn join(&self, conn_id: &str, user_id: DbId) -> bool {
        match self.connections.write().await.get_mut(conn_id) {
            Some(conn) => {
                conn.user_id = Some(user_id);
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Connection ids in a user's room.
    pub async fn get_by_user(&self, user_id: DbId) -> Vec<String> {
        self.connections
            .read()
            .await
            .iter()
            .filter(|(_, conn)| conn.user_id == Some(user_id))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Send a frame to every connection in a user's room.
    ///
    /// Connections whose channels are closed are skipped (they are removed
    /// when their receive loop ends). Returns how many connections took
    /// the frame.
    pub async fn send_to_user(&self, user_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|conn| conn.user_id == Some(user_id))
            .filter(|conn| conn.sender.send(message.clone()).is_ok())
            .count()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Queue a Close frame on every socket and forget them all.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Queue a Ping on every connection. Returns how many took it.
    pub async fn ping_all(&self) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|conn| conn.sender.send(Message::Ping(Bytes::new())).is_ok())
            .count()
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomBroker for WsManager {
    async fn push(&self, user_id: DbId, event: &ServerEvent) -> usize {
        let frame = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(user_id, event = event.name(), error = %e, "Failed to encode event");
                return 0;
            }
        };
        self.send_to_user(user_id, Message::Text(frame.into())).await
    }
}
