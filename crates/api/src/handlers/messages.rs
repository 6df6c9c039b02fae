//! Handlers for the `/messages` resource.
//!
//! REST and the WebSocket `send_message` event share [`send_message`]:
//! persist first, then push.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hrflow_core::message::validate_message;
use hrflow_core::policy::{self, Action, Resource};
use hrflow_core::records::{MessageRecord, PublicUser};
use hrflow_core::types::DbId;
use hrflow_db::models::CreateMessage;
use hrflow_events::NewMessage;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::response::{CountResponse, DataResponse};
use crate::state::AppState;

/// Validate, authorize and deliver a direct message from `sender`.
pub async fn send_message(
    state: &AppState,
    sender: &PublicUser,
    message: NewMessage,
) -> AppResult<MessageRecord> {
    let actor = sender.member();
    policy::require(&actor, Resource::Message, Action::Create)?;
    validate_message(
        message.kind,
        message.content.as_deref(),
        message.media_url.as_deref(),
    )?;

    let receiver = state
        .store
        .find_user(message.receiver_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", message.receiver_id))?;
    policy::can_message(&actor, &receiver.member())?;

    let create = CreateMessage {
        sender_id: sender.id,
        receiver_id: receiver.id,
        content: message.content.unwrap_or_default(),
        message_type: message.kind,
        media_url: message.media_url,
    };
    let record = state.fanout.deliver_message(&create, &sender.name).await?;
    Ok(record)
}

/// POST /api/messages
pub async fn create_message(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<MessageRecord>>)> {
    let record = send_message(&state, &auth.user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/messages/{userId}
///
/// The conversation between the caller and `userId`, oldest first.
pub async fn conversation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(other_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MessageRecord>>>> {
    let actor = auth.member();
    let other = state
        .store
        .find_user(other_id)
        .await?
        .filter(|u| policy::can_see_user(&actor, &u.member()))
        .ok_or_else(|| AppError::not_found("User", other_id))?;

    let messages = state.store.conversation(actor.id, other.id).await?;
    Ok(Json(DataResponse {
        data: messages.into_iter().map(Into::into).collect(),
    }))
}

/// PUT /api/messages/{id}/read
///
/// Only the receiver can mark a message read.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MessageRecord>>> {
    let message = state
        .store
        .mark_message_read(id, auth.id())
        .await?
        .ok_or_else(|| AppError::not_found("Message", id))?;

    Ok(Json(DataResponse {
        data: message.into(),
    }))
}

/// GET /api/messages/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CountResponse>>> {
    let count = state.store.unread_message_count(auth.id()).await?;
    Ok(Json(DataResponse {
        data: CountResponse { count },
    }))
}
