//! Handlers for the `/attendance` resource.
//!
//! Marks are append-only: one per employee per day, never edited.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use hrflow_core::attendance::{validate_mark, AttendanceStatus};
use hrflow_core::error::CoreError;
use hrflow_core::policy::{self, Action, Resource};
use hrflow_core::records::AttendanceRecord;
use hrflow_core::reference::Ref;
use hrflow_core::types::{today, DbId, Timestamp};
use hrflow_db::models::CreateAttendance;
use hrflow_db::store::UQ_ATTENDANCE_DAY;
use hrflow_db::StoreError;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::handlers::directory::Directory;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /attendance`.
#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    /// Only marks for this calendar day (`YYYY-MM-DD`).
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub employee_id: DbId,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub status: AttendanceStatus,
    pub check_in_time: Option<Timestamp>,
}

/// GET /api/attendance
pub async fn list_attendance(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AttendanceQuery>,
) -> AppResult<Json<DataResponse<Vec<AttendanceRecord>>>> {
    let scope = policy::list_scope(&auth.member(), Resource::Attendance);
    let marks = state.store.list_attendance(scope, params.date).await?;

    let directory = Directory::load(
        state.store.as_ref(),
        marks.iter().flat_map(|a| [a.employee_id, a.marked_by]),
    )
    .await?;

    Ok(Json(DataResponse {
        data: marks
            .into_iter()
            .map(|a| a.into_record(|id| directory.user(id)))
            .collect(),
    }))
}

/// POST /api/attendance
///
/// HR/admin mark an account they manage. A second mark for the same day
/// is a 409.
pub async fn mark_attendance(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<MarkAttendanceRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AttendanceRecord>>)> {
    let actor = auth.member();
    policy::require(&actor, Resource::Attendance, Action::Create)?;

    let employee = state
        .store
        .find_user(input.employee_id)
        .await?
        .filter(|u| policy::can_see_user(&actor, &u.member()))
        .ok_or_else(|| AppError::not_found("User", input.employee_id))?;
    if !policy::manages(&actor, &employee.member()) {
        return Err(CoreError::forbidden(
            "You can only mark attendance for accounts you manage",
        )
        .into());
    }

    let date = input.date.unwrap_or_else(today);
    if date > today() {
        return Err(
            CoreError::validation("Attendance cannot be marked for a future date").into(),
        );
    }
    validate_mark(input.status, input.check_in_time)?;

    let create = CreateAttendance {
        employee_id: employee.id,
        date,
        status: input.status,
        check_in_time: input.check_in_time,
        marked_by: actor.id,
    };
    let mark = match state.store.create_attendance(&create).await {
        Ok(mark) => mark,
        Err(StoreError::UniqueViolation(c)) if c == UQ_ATTENDANCE_DAY => {
            return Err(CoreError::Conflict(format!(
                "Attendance for {} on {date} has already been marked",
                employee.name
            ))
            .into());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(
        attendance_id = mark.id,
        employee_id = mark.employee_id,
        date = %mark.date,
        status = %mark.status,
        "Attendance marked"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: mark.into_record(Ref::Id),
        }),
    ))
}
