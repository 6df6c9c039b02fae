//! Handlers for the `/notifications` resource.
//!
//! Every endpoint acts on the caller's own notifications only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use hrflow_core::error::CoreError;
use hrflow_core::notification::{NotificationDraft, NotificationKind};
use hrflow_core::policy::{self, Action, Resource};
use hrflow_core::records::NotificationRecord;
use hrflow_core::types::DbId;
use hrflow_db::StoreError;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::{CountResponse, DataResponse};
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    #[serde(default)]
    pub unread_only: bool,
}

/// Body for `POST /notifications`: a general announcement to one user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    pub user_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedRead {
    pub marked_read: u64,
}

/// GET /api/notifications
///
/// Newest first.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<NotificationRecord>>>> {
    let notifications = state
        .store
        .list_notifications(auth.id(), params.unread_only)
        .await?;

    Ok(Json(DataResponse {
        data: notifications.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/notifications
///
/// Admin/hr send a `general` notification to someone in their roster.
pub async fn send_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<SendNotificationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<NotificationRecord>>)> {
    let actor = auth.member();
    policy::require(&actor, Resource::Notification, Action::Create)?;

    let recipient = state
        .store
        .find_user(input.user_id)
        .await?
        .filter(|u| policy::can_see_user(&actor, &u.member()))
        .ok_or_else(|| AppError::not_found("User", input.user_id))?;
    if recipient.id == actor.id {
        return Err(CoreError::validation("Cannot send a notification to yourself").into());
    }

    let draft = NotificationDraft::new(
        NotificationKind::General,
        input.title.trim(),
        input.message.trim(),
        None,
    );
    // Here the notification is the primary write, so a failure is the
    // request's failure.
    let record = state
        .fanout
        .notify(recipient.id, draft)
        .await
        .ok_or_else(|| StoreError::Backend("Notification could not be stored".into()))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// PUT /api/notifications/{id}/read
///
/// Idempotent: reading twice keeps the first `readAt`.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<NotificationRecord>>> {
    let notification = state
        .store
        .mark_notification_read(id, auth.id())
        .await?
        .ok_or_else(|| AppError::not_found("Notification", id))?;

    Ok(Json(DataResponse {
        data: notification.into(),
    }))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked_read = state.store.mark_all_notifications_read(auth.id()).await?;
    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CountResponse>>> {
    let count = state.store.unread_notification_count(auth.id()).await?;
    Ok(Json(DataResponse {
        data: CountResponse { count },
    }))
}
