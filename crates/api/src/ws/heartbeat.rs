use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::ws::manager::WsManager;

/// Idle sockets behind proxies get dropped after about a minute.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Ping every open socket each `every` until `cancel` fires.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while cancel.run_until_cancelled(ticker.tick()).await.is_some() {
            let pinged = ws_manager.ping_all().await;
            if pinged > 0 {
                tracing::debug!(pinged, "Heartbeat");
            }
        }
        tracing::debug!("Heartbeat stopped");
    })
}
