//! Integration tests for attendance marking, including the one-mark-per-day
//! rule under concurrent requests.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Local, Utc};
use common::{body_json, get_auth, post_json_auth, TestApp};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: hr marks its employee; the date defaults to today
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hr_marks_attendance_for_today() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = post_json_auth(
        app.app(),
        "/api/attendance",
        json!({
            "employeeId": org.employee_id,
            "status": "present",
            "checkInTime": Utc::now()
        }),
        &org.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["date"], Local::now().date_naive().to_string());
    assert_eq!(json["data"]["status"], "present");
    assert_eq!(json["data"]["markedBy"], org.hr_id);
}

// ---------------------------------------------------------------------------
// Test: a second mark for the same day is a 409
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_mark_same_day_conflicts() {
    let app = TestApp::new();
    let org = app.org().await;
    let body = json!({ "employeeId": org.employee_id, "status": "absent" });

    let first = post_json_auth(app.app(), "/api/attendance", body.clone(), &org.hr).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(app.app(), "/api/attendance", body, &org.hr).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");
}

#[tokio::test]
async fn concurrent_marks_yield_one_success() {
    let app = TestApp::new();
    let org = app.org().await;
    let body = json!({ "employeeId": org.employee_id, "status": "absent" });

    let (a, b) = tokio::join!(
        post_json_auth(app.app(), "/api/attendance", body.clone(), &org.hr),
        post_json_auth(app.app(), "/api/attendance", body.clone(), &org.hr),
    );

    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
}

// ---------------------------------------------------------------------------
// Test: validation of the mark itself
// ---------------------------------------------------------------------------

#[tokio::test]
async fn present_without_check_in_is_rejected() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = post_json_auth(
        app.app(),
        "/api/attendance",
        json!({ "employeeId": org.employee_id, "status": "present" }),
        &org.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn late_without_check_in_is_rejected() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = post_json_auth(
        app.app(),
        "/api/attendance",
        json!({ "employeeId": org.employee_id, "status": "late" }),
        &org.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("late"));
}

#[tokio::test]
async fn future_dates_are_rejected() {
    let app = TestApp::new();
    let org = app.org().await;
    let tomorrow = Local::now().date_naive() + Duration::days(1);

    let response = post_json_auth(
        app.app(),
        "/api/attendance",
        json!({
            "employeeId": org.employee_id,
            "date": tomorrow.to_string(),
            "status": "absent"
        }),
        &org.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: who may mark whom
// ---------------------------------------------------------------------------

#[tokio::test]
async fn employees_cannot_mark_attendance() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = post_json_auth(
        app.app(),
        "/api/attendance",
        json!({ "employeeId": org.employee_id, "status": "absent" }),
        &org.employee,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn hr_cannot_mark_another_hrs_employee() {
    let app = TestApp::new();
    let org = app.org().await;
    let (_, other_hr) = app.create_user(&org.admin, "Oscar Hr").await;

    let response = post_json_auth(
        app.app(),
        "/api/attendance",
        json!({ "employeeId": org.employee_id, "status": "absent" }),
        &other_hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: listing is scoped and filterable by date
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_filters_by_date() {
    let app = TestApp::new();
    let org = app.org().await;
    let today = Local::now().date_naive();
    let yesterday = today - Duration::days(1);

    for date in [today, yesterday] {
        let response = post_json_auth(
            app.app(),
            "/api/attendance",
            json!({
                "employeeId": org.employee_id,
                "date": date.to_string(),
                "status": "absent"
            }),
            &org.hr,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let all = body_json(get_auth(app.app(), "/api/attendance", &org.employee).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);
    // Listed marks carry the employee's populated reference.
    assert_eq!(all["data"][0]["employeeId"]["name"], "Evan Employee");

    let uri = format!("/api/attendance?date={yesterday}");
    let filtered = body_json(get_auth(app.app(), &uri, &org.hr).await).await;
    let marks = filtered["data"].as_array().unwrap();
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0]["date"], yesterday.to_string());

    let (_, coworker) = app.create_user(&org.hr, "Cora Worker").await;
    let theirs = body_json(get_auth(app.app(), "/api/attendance", &coworker).await).await;
    assert!(theirs["data"].as_array().unwrap().is_empty());
}
