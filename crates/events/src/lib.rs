//! Real-time events and notification fanout.
//!
//! - [`ServerEvent`] / [`ClientEvent`]: the JSON frames exchanged over the
//!   per-user WebSocket room.
//! - [`RoomBroker`]: the seam through which events reach a user's live
//!   connections. The API server implements it on its connection manager.
//! - [`Fanout`]: turns a successful primary write into a stored
//!   notification plus a best-effort push.

pub mod broker;
pub mod fanout;
pub mod wire;

pub use broker::{NullBroker, RoomBroker};
pub use fanout::Fanout;
pub use wire::{ClientEvent, NewMessage, ServerEvent};
