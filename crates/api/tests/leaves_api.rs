//! Integration tests for leave requests: date rules, approver resolution and
//! the one-shot decision.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Local, NaiveDate};
use common::{body_json, get_auth, post_json_auth, put_json_auth, TestApp};
use serde_json::{json, Value};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn leave_body(start: NaiveDate, end: NaiveDate) -> Value {
    json!({
        "startDate": start.to_string(),
        "endDate": end.to_string(),
        "reason": "Family event"
    })
}

// ---------------------------------------------------------------------------
// Test: start dates are checked against today
// ---------------------------------------------------------------------------

#[tokio::test]
async fn leave_starting_today_is_accepted() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = post_json_auth(
        app.app(),
        "/api/leaves",
        leave_body(today(), today() + Duration::days(2)),
        &org.employee,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["appliedTo"], org.hr_id);
    assert_eq!(json["data"]["employeeName"], "Evan Employee");
}

#[tokio::test]
async fn leave_starting_yesterday_is_rejected() {
    let app = TestApp::new();
    let org = app.org().await;
    let yesterday = today() - Duration::days(1);

    let response = post_json_auth(
        app.app(),
        "/api/leaves",
        leave_body(yesterday, today()),
        &org.employee,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn leave_ending_before_it_starts_is_rejected() {
    let app = TestApp::new();
    let org = app.org().await;
    let start = today() + Duration::days(5);

    let response = post_json_auth(
        app.app(),
        "/api/leaves",
        leave_body(start, start - Duration::days(1)),
        &org.employee,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reason_is_required() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = post_json_auth(
        app.app(),
        "/api/leaves",
        json!({
            "startDate": today().to_string(),
            "endDate": today().to_string(),
            "reason": "  "
        }),
        &org.employee,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: approver rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn employee_cannot_apply_to_another_hr() {
    let app = TestApp::new();
    let org = app.org().await;
    let (other_hr_id, _) = app.create_user(&org.admin, "Oscar Hr").await;

    let mut body = leave_body(today(), today());
    body["appliedTo"] = json!(other_hr_id);
    let response = post_json_auth(app.app(), "/api/leaves", body, &org.employee).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admins_do_not_apply_for_leave() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = post_json_auth(
        app.app(),
        "/api/leaves",
        leave_body(today(), today()),
        &org.admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn hr_leave_goes_to_an_admin() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = post_json_auth(
        app.app(),
        "/api/leaves",
        leave_body(today(), today()),
        &org.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["appliedTo"], org.admin_id);
}

// ---------------------------------------------------------------------------
// Test: the creating hr approves; the requester is notified
// ---------------------------------------------------------------------------

#[tokio::test]
async fn approval_by_creator_hr() {
    let app = TestApp::new();
    let org = app.org().await;

    let created = post_json_auth(
        app.app(),
        "/api/leaves",
        leave_body(today() + Duration::days(1), today() + Duration::days(3)),
        &org.employee,
    )
    .await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    // The approver was told about the request.
    let hr_notes = body_json(get_auth(app.app(), "/api/notifications", &org.hr).await).await;
    assert_eq!(hr_notes["data"][0]["type"], "leave");
    assert_eq!(hr_notes["data"][0]["targetId"], id);

    let uri = format!("/api/leaves/{id}/decision");
    let response = put_json_auth(app.app(), &uri, json!({ "status": "approved" }), &org.hr).await;
    assert_eq!(response.status(), StatusCode::OK);
    let decided = body_json(response).await;
    assert_eq!(decided["data"]["status"], "approved");
    assert!(decided["data"]["respondedAt"].is_string());

    let list = body_json(get_auth(app.app(), "/api/leaves", &org.employee).await).await;
    assert_eq!(list["data"][0]["status"], "approved");
    assert!(list["data"][0]["respondedAt"].is_string());

    let notes = body_json(get_auth(app.app(), "/api/notifications", &org.employee).await).await;
    let leave_notes: Vec<&Value> = notes["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["type"] == "leave")
        .collect();
    assert_eq!(leave_notes.len(), 1);
    assert_eq!(leave_notes[0]["targetId"], id);

    // Decided exactly once.
    let response = put_json_auth(app.app(), &uri, json!({ "status": "rejected" }), &org.hr).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: an hr deciding a leave applied to another hr is forbidden
// ---------------------------------------------------------------------------

#[tokio::test]
async fn other_hr_cannot_decide() {
    let app = TestApp::new();
    let org = app.org().await;
    let (_, other_hr) = app.create_user(&org.admin, "Oscar Hr").await;

    let created = post_json_auth(
        app.app(),
        "/api/leaves",
        leave_body(today(), today()),
        &org.employee,
    )
    .await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.app(),
        &format!("/api/leaves/{id}/decision"),
        json!({ "status": "approved" }),
        &other_hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn employee_cannot_decide() {
    let app = TestApp::new();
    let org = app.org().await;

    let created = post_json_auth(
        app.app(),
        "/api/leaves",
        leave_body(today(), today()),
        &org.employee,
    )
    .await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.app(),
        &format!("/api/leaves/{id}/decision"),
        json!({ "status": "approved" }),
        &org.employee,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deciding_a_missing_leave_is_not_found() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = put_json_auth(
        app.app(),
        "/api/leaves/424242/decision",
        json!({ "status": "approved" }),
        &org.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
