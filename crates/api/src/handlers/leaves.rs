//! Handlers for the `/leaves` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use hrflow_core::error::CoreError;
use hrflow_core::leave::{self, LeaveStatus};
use hrflow_core::notification::NotificationDraft;
use hrflow_core::policy::{self, Action, Resource};
use hrflow_core::records::LeaveRecord;
use hrflow_core::reference::Ref;
use hrflow_core::types::{today, DbId};
use hrflow_db::models::CreateLeave;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::handlers::directory::Directory;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyLeaveRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    /// Defaults to the requester's manager (or the oldest admin for hr
    /// accounts without one).
    pub applied_to: Option<DbId>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DecideLeaveRequest {
    pub status: LeaveStatus,
}

/// GET /api/leaves
pub async fn list_leaves(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<LeaveRecord>>>> {
    let scope = policy::list_scope(&auth.member(), Resource::Leave);
    let leaves = state.store.list_leaves(scope).await?;

    let directory = Directory::load(
        state.store.as_ref(),
        leaves.iter().flat_map(|l| [l.employee_id, l.applied_to]),
    )
    .await?;

    Ok(Json(DataResponse {
        data: leaves
            .into_iter()
            .map(|l| l.into_record(|id| directory.user(id)))
            .collect(),
    }))
}

/// POST /api/leaves
///
/// Employees apply to their hr; hr applies to an admin. The approver is
/// notified.
pub async fn apply_leave(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ApplyLeaveRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<LeaveRecord>>)> {
    let requester = auth.member();
    policy::require(&requester, Resource::Leave, Action::Create)?;
    leave::validate_reason(&input.reason)?;
    leave::validate_leave_dates(input.start_date, input.end_date, today())?;

    let approver_id = match input.applied_to {
        Some(id) => Some(id),
        None => {
            let fallback = state.store.oldest_admin().await?.map(|a| a.id);
            leave::default_approver(&requester, fallback)
        }
    }
    .ok_or_else(|| CoreError::validation("No approver is available for this leave request"))?;

    let approver = state
        .store
        .find_user(approver_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", approver_id))?;
    leave::validate_approver(&requester, &approver.member())?;

    let create = CreateLeave {
        employee_id: requester.id,
        employee_name: auth.user.name.clone(),
        start_date: input.start_date,
        end_date: input.end_date,
        reason: input.reason.trim().to_string(),
        applied_to: approver.id,
    };
    let request = state.store.create_leave(&create).await?;
    tracing::info!(
        leave_id = request.id,
        employee_id = request.employee_id,
        applied_to = request.applied_to,
        "Leave requested"
    );

    state
        .fanout
        .notify(
            request.applied_to,
            NotificationDraft::leave_applied(
                request.id,
                &request.employee_name,
                request.start_date,
                request.end_date,
            ),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: request.into_record(Ref::Id),
        }),
    ))
}

/// PUT /api/leaves/{id}/decision
///
/// The designated approver (or an admin) approves or rejects a pending
/// request, exactly once. The requester is notified.
pub async fn decide_leave(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<DecideLeaveRequest>,
) -> AppResult<Json<DataResponse<LeaveRecord>>> {
    let actor = auth.member();
    policy::require(&actor, Resource::Leave, Action::Decide)?;

    let request = state
        .store
        .find_leave(id)
        .await?
        .ok_or_else(|| AppError::not_found("LeaveRequest", id))?;

    leave::can_decide(&actor, request.applied_to)?;
    leave::validate_decision(request.status, input.status)?;

    let decided = state
        .store
        .decide_leave(id, input.status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::validation("Leave request has already been decided"))
        })?;
    tracing::info!(
        leave_id = id,
        decision = %decided.status,
        decided_by = actor.id,
        "Leave decided"
    );

    state
        .fanout
        .notify(
            decided.employee_id,
            NotificationDraft::leave_decided(
                decided.id,
                decided.status,
                decided.start_date,
                decided.end_date,
            ),
        )
        .await;

    Ok(Json(DataResponse {
        data: decided.into_record(Ref::Id),
    }))
}
