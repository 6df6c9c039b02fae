//! The room broker seam.

use async_trait::async_trait;
use hrflow_core::types::DbId;

use crate::wire::ServerEvent;

/// Delivers events to the live connections in a user's room.
///
/// Delivery is fire-and-forget: implementations log their own failures and
/// report how many connections the event was handed to.
#[async_trait]
pub trait RoomBroker: Send + Sync {
    async fn push(&self, user_id: DbId, event: &ServerEvent) -> usize;
}

/// Broker with no connections. Every push reaches nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBroker;

#[async_trait]
impl RoomBroker for NullBroker {
    async fn push(&self, user_id: DbId, event: &ServerEvent) -> usize {
        tracing::trace!(user_id, event = event.name(), "No broker; event dropped");
        0
    }
}
