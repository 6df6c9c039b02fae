//! Handlers for the `/tasks` resource.
//!
//! Progress (`status`) belongs to the assignee; the review outcome
//! (`approvalStatus`) belongs to the assigner.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hrflow_core::error::CoreError;
use hrflow_core::notification::NotificationDraft;
use hrflow_core::policy::{self, Action, Member, Resource};
use hrflow_core::records::{Submission, TaskRecord};
use hrflow_core::reference::Ref;
use hrflow_core::roles::Role;
use hrflow_core::task::{self, ApprovalStatus, Priority, TaskStatus};
use hrflow_core::types::{DbId, Timestamp};
use hrflow_db::models::{CreateTask, Task, TaskProgress};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::handlers::directory::Directory;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assigned_to: DbId,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    #[serde(default)]
    pub allowed_formats: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
    pub submission: Option<Submission>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub approval_status: ApprovalStatus,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_participant(actor: &Member, task: &Task) -> bool {
    actor.role == Role::Admin || actor.id == task.assigned_to || actor.id == task.assigned_by
}

/// Load a task the caller takes part in; anything else is a 404.
async fn find_visible(state: &AppState, actor: &Member, id: DbId) -> AppResult<Task> {
    state
        .store
        .find_task(id)
        .await?
        .filter(|t| is_participant(actor, t))
        .ok_or_else(|| AppError::not_found("Task", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/tasks
///
/// Newest first, with `assignedTo` and `assignedBy` populated.
pub async fn list_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TaskRecord>>>> {
    let scope = policy::list_scope(&auth.member(), Resource::Task);
    let tasks = state.store.list_tasks(scope).await?;

    let directory = Directory::load(
        state.store.as_ref(),
        tasks.iter().flat_map(|t| [t.assigned_to, t.assigned_by]),
    )
    .await?;

    Ok(Json(DataResponse {
        data: tasks
            .into_iter()
            .map(|t| t.into_record(|id| directory.user(id)))
            .collect(),
    }))
}

/// POST /api/tasks
///
/// Assign a task to an account the caller manages and notify the assignee.
pub async fn create_task(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TaskRecord>>)> {
    let actor = auth.member();
    policy::require(&actor, Resource::Task, Action::Create)?;
    task::validate_new_task(&input.title)?;

    let assignee = state
        .store
        .find_user(input.assigned_to)
        .await?
        .ok_or_else(|| AppError::not_found("User", input.assigned_to))?;
    policy::can_assign(&actor, &assignee.member())?;

    let create = CreateTask {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        assigned_to: assignee.id,
        assigned_by: actor.id,
        priority: input.priority,
        due_date: input.due_date,
        allowed_formats: task::normalize_formats(&input.allowed_formats),
    };
    let task = state.store.create_task(&create).await?;
    tracing::info!(
        task_id = task.id,
        assigned_to = task.assigned_to,
        assigned_by = task.assigned_by,
        "Task created"
    );

    state
        .fanout
        .notify(
            task.assigned_to,
            NotificationDraft::task_assigned(task.id, &task.title, &auth.user.name),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: task.into_record(Ref::Id),
        }),
    ))
}

/// PUT /api/tasks/{id}/status
///
/// The assignee moves the task forward. Reaching `completed` stamps
/// `submittedAt`, stores the submission and notifies the assigner.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<TaskRecord>>> {
    let actor = auth.member();
    policy::require(&actor, Resource::Task, Action::Update)?;

    let current = find_visible(&state, &actor, id).await?;
    if current.assigned_to != actor.id {
        return Err(CoreError::forbidden("Only the assignee can update task progress").into());
    }

    task::validate_status_transition(current.status, input.status)?;
    if let Some(submission) = &input.submission {
        if input.status != TaskStatus::Completed {
            return Err(CoreError::validation(
                "A submission can only be attached when completing a task",
            )
            .into());
        }
        task::validate_submission_format(&current.allowed_formats, &submission.document_type)?;
    }

    let progress = TaskProgress {
        from: current.status,
        to: input.status,
        submission: input.submission,
    };
    let updated = state
        .store
        .advance_task(id, &progress)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::validation(
                "Task status changed in the meantime; reload and try again",
            ))
        })?;
    tracing::info!(task_id = id, from = %progress.from, to = %progress.to, "Task progressed");

    if updated.status == TaskStatus::Completed {
        state
            .fanout
            .notify(
                updated.assigned_by,
                NotificationDraft::task_completed(updated.id, &updated.title, &auth.user.name),
            )
            .await;
    }

    Ok(Json(DataResponse {
        data: updated.into_record(Ref::Id),
    }))
}

/// PUT /api/tasks/{id}/approval
///
/// The assigner (or an admin) approves or rejects a completed task. The
/// decision is final.
pub async fn review_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<ApprovalRequest>,
) -> AppResult<Json<DataResponse<TaskRecord>>> {
    let actor = auth.member();
    policy::require(&actor, Resource::Task, Action::Decide)?;

    let current = find_visible(&state, &actor, id).await?;
    if current.assigned_by != actor.id && actor.role != Role::Admin {
        return Err(CoreError::forbidden("Only the assigner can review this task").into());
    }

    let decision = input.approval_status;
    task::validate_approval(current.status, current.approval_status, decision)?;

    let updated = state
        .store
        .review_task(id, decision)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::validation("Task has already been reviewed")))?;
    tracing::info!(task_id = id, decision = %decision, reviewer = actor.id, "Task reviewed");

    state
        .fanout
        .notify(
            updated.assigned_to,
            NotificationDraft::task_reviewed(updated.id, &updated.title, decision),
        )
        .await;

    Ok(Json(DataResponse {
        data: updated.into_record(Ref::Id),
    }))
}

/// DELETE /api/tasks/{id}
///
/// Only the original assigner may delete; everyone else gets a 404.
pub async fn delete_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let actor = auth.member();
    policy::require(&actor, Resource::Task, Action::Delete)?;

    let task = state
        .store
        .find_task(id)
        .await?
        .filter(|t| t.assigned_by == actor.id)
        .ok_or_else(|| AppError::not_found("Task", id))?;

    if !state.store.delete_task(task.id).await? {
        return Err(AppError::not_found("Task", id));
    }
    tracing::info!(task_id = id, deleted_by = actor.id, "Task deleted");

    Ok(Json(MessageResponse {
        message: "Task deleted",
    }))
}
