//! Handlers for the `/meetings` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hrflow_core::error::CoreError;
use hrflow_core::meeting::{self, MeetingStatus, DEFAULT_DURATION_MINS};
use hrflow_core::notification::NotificationDraft;
use hrflow_core::policy::{self, Action, Resource};
use hrflow_core::records::MeetingRecord;
use hrflow_core::reference::Ref;
use hrflow_core::roles::Role;
use hrflow_core::types::{DbId, Timestamp};
use hrflow_db::models::{CreateMeeting, Meeting};
use hrflow_db::store::UQ_MEETING_LINK;
use hrflow_db::StoreError;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::handlers::directory::Directory;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts at drawing a join link that is not already taken.
const LINK_ATTEMPTS: usize = 3;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMeetingRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub attendees: Vec<DbId>,
    pub date_time: Timestamp,
    /// Minutes; defaults to 30.
    pub duration: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MeetingStatusRequest {
    pub status: MeetingStatus,
}

/// GET /api/meetings
pub async fn list_meetings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MeetingRecord>>>> {
    let scope = policy::list_scope(&auth.member(), Resource::Meeting);
    let meetings = state.store.list_meetings(scope).await?;

    let directory = Directory::load(
        state.store.as_ref(),
        meetings
            .iter()
            .flat_map(|m| std::iter::once(m.scheduled_by).chain(m.attendees.iter().copied())),
    )
    .await?;

    Ok(Json(DataResponse {
        data: meetings
            .into_iter()
            .map(|m| m.into_record(|id| directory.user(id)))
            .collect(),
    }))
}

/// POST /api/meetings
///
/// Schedule a meeting with a generated join link. Every attendee gets a
/// notification; one failed notification does not affect the others.
pub async fn schedule_meeting(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ScheduleMeetingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MeetingRecord>>)> {
    let actor = auth.member();
    policy::require(&actor, Resource::Meeting, Action::Create)?;

    // The scheduler attends implicitly.
    let mut attendees: Vec<DbId> = Vec::with_capacity(input.attendees.len());
    for id in input.attendees {
        if id != actor.id && !attendees.contains(&id) {
            attendees.push(id);
        }
    }

    let duration = input.duration.unwrap_or(DEFAULT_DURATION_MINS);
    meeting::validate_schedule(
        &input.title,
        input.date_time,
        duration,
        attendees.len(),
        chrono::Utc::now(),
    )?;

    let found = state.store.find_users(&attendees).await?;
    for id in &attendees {
        let user = found
            .iter()
            .find(|u| u.id == *id)
            .ok_or_else(|| AppError::not_found("User", *id))?;
        policy::can_invite(&actor, &user.member())?;
    }

    let mut create = CreateMeeting {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        scheduled_by: actor.id,
        attendees,
        date_time: input.date_time,
        duration_mins: duration,
        meeting_link: String::new(),
    };
    let meeting = create_with_fresh_link(&state, &mut create).await?;
    tracing::info!(
        meeting_id = meeting.id,
        scheduled_by = meeting.scheduled_by,
        attendees = meeting.attendees.len(),
        "Meeting scheduled"
    );

    let draft = NotificationDraft::meeting_scheduled(
        meeting.id,
        &meeting.title,
        meeting.date_time,
        &auth.user.name,
    );
    state.fanout.notify_many(&meeting.attendees, &draft).await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: meeting.into_record(Ref::Id),
        }),
    ))
}

async fn create_with_fresh_link(
    state: &AppState,
    create: &mut CreateMeeting,
) -> AppResult<Meeting> {
    for _ in 0..LINK_ATTEMPTS {
        create.meeting_link = meeting::generate_meeting_link(&state.config.meeting_base_url);
        match state.store.create_meeting(create).await {
            Err(StoreError::UniqueViolation(c)) if c == UQ_MEETING_LINK => {
                tracing::warn!(link = %create.meeting_link, "Meeting link collision, retrying");
            }
            other => return Ok(other?),
        }
    }
    Err(AppError::InternalError("Could not generate a unique meeting link".into()))
}

/// PUT /api/meetings/{id}/status
///
/// The scheduler (or an admin) completes or cancels a scheduled meeting.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<MeetingStatusRequest>,
) -> AppResult<Json<DataResponse<MeetingRecord>>> {
    let actor = auth.member();
    policy::require(&actor, Resource::Meeting, Action::Update)?;

    let current = state
        .store
        .find_meeting(id)
        .await?
        .filter(|m| actor.role == Role::Admin || m.involves(actor.id))
        .ok_or_else(|| AppError::not_found("Meeting", id))?;
    if current.scheduled_by != actor.id && actor.role != Role::Admin {
        return Err(CoreError::forbidden("Only the organiser can change this meeting").into());
    }

    meeting::validate_status_transition(current.status, input.status)?;
    let updated = state
        .store
        .set_meeting_status(id, current.status, input.status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::validation(
                "Meeting status changed in the meantime; reload and try again",
            ))
        })?;
    tracing::info!(meeting_id = id, status = %updated.status, "Meeting status updated");

    Ok(Json(DataResponse {
        data: updated.into_record(Ref::Id),
    }))
}
