use std::ops::ControlFlow;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use hrflow_events::ClientEvent;

use crate::handlers::messages::send_message;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/ws
///
/// Upgrade an authenticated request to a WebSocket. The connection starts
/// in the caller's own room.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    auth: AuthUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, auth, state))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection in the caller's room.
///   2. Spawns a sender task that forwards frames from the manager channel.
///   3. Dispatches inbound client events on the current task until the
///      client leaves, the token expires or the account stops resolving.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, auth: AuthUser, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let user_id = auth.id();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket connected");

    let mut rx = state.ws_manager.add(conn_id.clone(), Some(user_id)).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    let remaining = (auth.expires_at - chrono::Utc::now().timestamp()).max(0);
    let expiry = tokio::time::sleep(Duration::from_secs(remaining as u64));
    tokio::pin!(expiry);

    loop {
        let result = tokio::select! {
            _ = &mut expiry => {
                tracing::info!(conn_id = %conn_id, user_id, "WebSocket token expired");
                break;
            }
            next = stream.next() => match next {
                Some(result) => result,
                None => break,
            },
        };
        match result {
            Ok(Message::Text(text)) => {
                let flow = handle_client_event(&state, &auth, &conn_id, text.as_str()).await;
                if flow.is_break() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket disconnected");
}

/// Dispatch one inbound frame.
///
/// Returns [`ControlFlow::Break`] when the connection must be closed because
/// its owner no longer authenticates.
pub async fn handle_client_event(
    state: &AppState,
    auth: &AuthUser,
    conn_id: &str,
    text: &str,
) -> ControlFlow<()> {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(conn_id, error = %e, "Ignoring unparseable frame");
            return ControlFlow::Continue(());
        }
    };

    match event {
        ClientEvent::JoinRoom { user_id } if user_id == auth.id() => {
            state.ws_manager.join(conn_id, user_id).await;
            tracing::info!(conn_id, user_id, "Joined room");
        }
        ClientEvent::JoinRoom { user_id } => {
            tracing::warn!(
                conn_id,
                user_id = auth.id(),
                requested = user_id,
                "Refused to join another user's room"
            );
        }
        ClientEvent::SendMessage(message) => {
            let sender = match auth.refresh(state).await {
                Ok(sender) => sender,
                Err(e) => {
                    tracing::warn!(
                        conn_id,
                        sender_id = auth.id(),
                        error = %e,
                        "Closing socket whose owner no longer authenticates"
                    );
                    return ControlFlow::Break(());
                }
            };
            let receiver_id = message.receiver_id;
            if let Err(e) = send_message(state, &sender.user, message).await {
                tracing::warn!(
                    conn_id,
                    sender_id = sender.id(),
                    receiver_id,
                    error = %e,
                    "Socket message rejected"
                );
            }
        }
    }
    ControlFlow::Continue(())
}
