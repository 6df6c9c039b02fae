//! WebSocket rooms for real-time delivery.
//!
//! Every connection belongs to the room of the user who opened it. The
//! [`WsManager`] is the [`hrflow_events::RoomBroker`] the fanout pushes
//! through.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{handle_client_event, ws_handler};
pub use heartbeat::{start_heartbeat, HEARTBEAT_INTERVAL};
pub use manager::WsManager;
