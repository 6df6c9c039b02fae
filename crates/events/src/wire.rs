//! WebSocket frame shapes.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use hrflow_core::message::MessageType;
use hrflow_core::records::{MessageRecord, NotificationRecord};
use hrflow_core::types::DbId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Server -> client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A direct message addressed to the room's user.
    ReceiveMessage(MessageRecord),
    /// A notification stored for the room's user.
    NewNotification(NotificationRecord),
}

impl ServerEvent {
    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::ReceiveMessage(_) => "receive_message",
            ServerEvent::NewNotification(_) => "new_notification",
        }
    }
}

// ---------------------------------------------------------------------------
// Client -> server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Ask to receive events for a room. Only the caller's own room is
    /// honoured.
    JoinRoom {
        #[serde(rename = "userId")]
        user_id: DbId,
    },
    /// Send a direct message. Goes through the same path as
    /// `POST /api/messages`.
    SendMessage(NewMessage),
}

/// A direct message as submitted by its sender.
///
/// The REST body names the recipient `receiverId`; socket frames may use
/// `to`. The sender always comes from the authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    #[serde(alias = "to")]
    pub receiver_id: DbId,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    #[serde(default)]
    pub media_url: Option<String>,
}
