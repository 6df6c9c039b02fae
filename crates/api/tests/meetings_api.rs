//! Integration tests for meeting scheduling and status changes.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get_auth, post_json_auth, put_json_auth, Org, TestApp};
use serde_json::{json, Value};

fn kickoff(org: &Org) -> Value {
    json!({
        "title": "Onboarding kickoff",
        "description": "Meet the team",
        "attendees": [org.employee_id, org.employee_id, org.hr_id],
        "dateTime": Utc::now() + Duration::days(1),
        "duration": 45
    })
}

// ---------------------------------------------------------------------------
// Test: scheduling generates a link and notifies each attendee once
// ---------------------------------------------------------------------------

#[tokio::test]
async fn schedule_meeting_notifies_attendees() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = post_json_auth(app.app(), "/api/meetings", kickoff(&org), &org.hr).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let meeting = &json["data"];
    assert_eq!(meeting["status"], "scheduled");
    assert_eq!(meeting["duration"], 45);
    // Duplicates and the organiser are dropped from the attendee list.
    assert_eq!(meeting["attendees"], json!([org.employee_id]));
    assert!(meeting["meetingLink"]
        .as_str()
        .unwrap()
        .starts_with("https://meet.test/"));

    let notes = body_json(get_auth(app.app(), "/api/notifications", &org.employee).await).await;
    let notes = notes["data"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["type"], "meeting");
    assert_eq!(notes[0]["targetId"], meeting["id"]);

    let hr_notes = body_json(get_auth(app.app(), "/api/notifications", &org.hr).await).await;
    assert!(hr_notes["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn meetings_in_the_past_are_rejected() {
    let app = TestApp::new();
    let org = app.org().await;

    let mut body = kickoff(&org);
    body["dateTime"] = json!(Utc::now() - Duration::hours(1));
    let response = post_json_auth(app.app(), "/api/meetings", body, &org.hr).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uninvitable_attendees_are_rejected() {
    let app = TestApp::new();
    let org = app.org().await;
    let (_, other_hr) = app.create_user(&org.admin, "Oscar Hr").await;

    let response = post_json_auth(app.app(), "/api/meetings", kickoff(&org), &other_hr).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let mut body = kickoff(&org);
    body["attendees"] = json!([987_654]);
    let response = post_json_auth(app.app(), "/api/meetings", body, &org.hr).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn employees_cannot_schedule() {
    let app = TestApp::new();
    let org = app.org().await;

    let mut body = kickoff(&org);
    body["attendees"] = json!([org.hr_id]);
    let response = post_json_auth(app.app(), "/api/meetings", body, &org.employee).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: listing populates people and is scoped to participants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn attendees_see_the_meeting() {
    let app = TestApp::new();
    let org = app.org().await;
    let (_, coworker) = app.create_user(&org.hr, "Cora Worker").await;
    post_json_auth(app.app(), "/api/meetings", kickoff(&org), &org.hr).await;

    let list = body_json(get_auth(app.app(), "/api/meetings", &org.employee).await).await;
    let meetings = list["data"].as_array().unwrap();
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0]["scheduledBy"]["name"], "Helen Hr");
    assert_eq!(meetings[0]["attendees"][0]["name"], "Evan Employee");

    let list = body_json(get_auth(app.app(), "/api/meetings", &coworker).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: only the organiser changes status, once
// ---------------------------------------------------------------------------

#[tokio::test]
async fn organiser_cancels_once() {
    let app = TestApp::new();
    let org = app.org().await;
    let created = post_json_auth(app.app(), "/api/meetings", kickoff(&org), &org.hr).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/meetings/{id}/status");

    let response =
        put_json_auth(app.app(), &uri, json!({ "status": "cancelled" }), &org.employee).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(app.app(), &uri, json!({ "status": "cancelled" }), &org.hr).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "cancelled");

    let response = put_json_auth(app.app(), &uri, json!({ "status": "completed" }), &org.hr).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
