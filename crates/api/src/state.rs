use std::sync::Arc;

use hrflow_db::Store;
use hrflow_events::{Fanout, RoomBroker};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Storage backend (Postgres or in-memory).
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
    /// WebSocket connections, grouped into one room per user.
    pub ws_manager: Arc<WsManager>,
    /// Notification fanout; pushes through `ws_manager`.
    pub fanout: Fanout<dyn Store>,
}

impl AppState {
    /// Wire the store, config and a fresh connection manager together.
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        let ws_manager = Arc::new(WsManager::new());
        let broker: Arc<dyn RoomBroker> = ws_manager.clone();
        let fanout = Fanout::new(Arc::clone(&store), broker);
        Self {
            store,
            config: Arc::new(config),
            ws_manager,
            fanout,
        }
    }
}
