//! reqwest-backed implementation of [`HrApi`].

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use hrflow_core::leave::LeaveStatus;
use hrflow_core::meeting::MeetingStatus;
use hrflow_core::records::{
    AttendanceRecord, LeaveRecord, MeetingRecord, MessageRecord, NotificationRecord, PublicUser,
    TaskRecord,
};
use hrflow_core::task::ApprovalStatus;
use hrflow_core::types::DbId;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::{CreatedUser, HrApi, Session};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::requests::{
    LoginRequest, NewAttendance, NewLeave, NewMeeting, NewNotification, NewTask, NewUser,
    OutgoingMessage, PasswordChange, StatusUpdate, TaskApproval, TaskProgress, UserPatch,
};

/// `{ "data": T }` envelope used by every resource endpoint.
#[derive(Deserialize)]
struct Data<T> {
    data: T,
}

#[derive(Deserialize)]
struct Count {
    count: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkedRead {
    marked_read: u64,
}

/// HTTP client for the hrflow API. Holds the bearer token of the current
/// session; any `Unauthenticated` answer clears it.
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(config.token.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        let request = self.client.request(method, url);
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = ClientError::from_response(status, &text);
            if err.is_unauthenticated() {
                tracing::debug!(%status, "Session rejected, clearing token");
                self.clear_token();
            }
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| {
            ClientError::InvalidResponse(format!("{e} (status {status})"))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<Data<T>>(self.request(Method::GET, path))
            .await
            .map(|d| d.data)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send::<Data<T>>(self.request(Method::POST, path).json(body))
            .await
            .map(|d| d.data)
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send::<Data<T>>(self.request(Method::PUT, path).json(body))
            .await
            .map(|d| d.data)
    }

    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<Data<T>>(self.request(Method::PUT, path))
            .await
            .map(|d| d.data)
    }

    /// For endpoints that answer `{ "message": ... }`; the body is ignored.
    async fn send_for_ack(&self, request: RequestBuilder) -> ClientResult<()> {
        self.send::<serde_json::Value>(request).await.map(|_| ())
    }

    // ========== Endpoints outside the cached views ==========

    pub async fn get_user(&self, id: DbId) -> ClientResult<PublicUser> {
        self.get(&format!("/users/{id}")).await
    }

    pub async fn change_password(&self, current: &str, new: &str) -> ClientResult<()> {
        let body = PasswordChange {
            current_password: current,
            new_password: new,
        };
        self.send_for_ack(self.request(Method::PUT, "/users/me/password").json(&body))
            .await
    }

    pub async fn send_notification(
        &self,
        input: &NewNotification,
    ) -> ClientResult<NotificationRecord> {
        self.post("/notifications", input).await
    }

    pub async fn unread_notifications(&self) -> ClientResult<Vec<NotificationRecord>> {
        self.get("/notifications?unreadOnly=true").await
    }

    pub async fn notification_unread_count(&self) -> ClientResult<i64> {
        self.get::<Count>("/notifications/unread-count")
            .await
            .map(|c| c.count)
    }

    pub async fn send_message(&self, message: &OutgoingMessage) -> ClientResult<MessageRecord> {
        self.post("/messages", message).await
    }

    /// History with `other_id`, oldest first.
    pub async fn conversation(&self, other_id: DbId) -> ClientResult<Vec<MessageRecord>> {
        self.get(&format!("/messages/{other_id}")).await
    }

    pub async fn mark_message_read(&self, id: DbId) -> ClientResult<MessageRecord> {
        self.put_empty(&format!("/messages/{id}/read")).await
    }

    pub async fn message_unread_count(&self) -> ClientResult<i64> {
        self.get::<Count>("/messages/unread-count")
            .await
            .map(|c| c.count)
    }
}

#[async_trait]
impl HrApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let body = LoginRequest { email, password };
        let session: Session = self
            .send(self.request(Method::POST, "/auth/login").json(&body))
            .await?;
        self.set_token(session.token.clone());
        tracing::info!(user_id = session.user.id, "Signed in");
        Ok(session)
    }

    async fn logout(&self) -> ClientResult<()> {
        let result = self
            .send_for_ack(self.request(Method::POST, "/auth/logout"))
            .await;
        // The local session ends whether or not the server heard about it.
        self.clear_token();
        result
    }

    async fn me(&self) -> ClientResult<PublicUser> {
        self.get("/auth/me").await
    }

    async fn list_users(&self) -> ClientResult<Vec<PublicUser>> {
        self.get("/users").await
    }

    async fn create_user(&self, input: &NewUser) -> ClientResult<CreatedUser> {
        self.post("/users", input).await
    }

    async fn update_user(&self, id: DbId, patch: &UserPatch) -> ClientResult<PublicUser> {
        self.put(&format!("/users/{id}"), patch).await
    }

    async fn delete_user(&self, id: DbId) -> ClientResult<()> {
        self.send_for_ack(self.request(Method::DELETE, &format!("/users/{id}")))
            .await
    }

    async fn list_tasks(&self) -> ClientResult<Vec<TaskRecord>> {
        self.get("/tasks").await
    }

    async fn create_task(&self, input: &NewTask) -> ClientResult<TaskRecord> {
        self.post("/tasks", input).await
    }

    async fn update_task_status(
        &self,
        id: DbId,
        input: &TaskProgress,
    ) -> ClientResult<TaskRecord> {
        self.put(&format!("/tasks/{id}/status"), input).await
    }

    async fn review_task(&self, id: DbId, decision: ApprovalStatus) -> ClientResult<TaskRecord> {
        let body = TaskApproval {
            approval_status: decision,
        };
        self.put(&format!("/tasks/{id}/approval"), &body).await
    }

    async fn delete_task(&self, id: DbId) -> ClientResult<()> {
        self.send_for_ack(self.request(Method::DELETE, &format!("/tasks/{id}")))
            .await
    }

    async fn list_leaves(&self) -> ClientResult<Vec<LeaveRecord>> {
        self.get("/leaves").await
    }

    async fn apply_leave(&self, input: &NewLeave) -> ClientResult<LeaveRecord> {
        self.post("/leaves", input).await
    }

    async fn decide_leave(&self, id: DbId, status: LeaveStatus) -> ClientResult<LeaveRecord> {
        self.put(&format!("/leaves/{id}/decision"), &StatusUpdate { status })
            .await
    }

    async fn list_attendance(
        &self,
        date: Option<NaiveDate>,
    ) -> ClientResult<Vec<AttendanceRecord>> {
        match date {
            Some(date) => self.get(&format!("/attendance?date={date}")).await,
            None => self.get("/attendance").await,
        }
    }

    async fn mark_attendance(&self, input: &NewAttendance) -> ClientResult<AttendanceRecord> {
        self.post("/attendance", input).await
    }

    async fn list_meetings(&self) -> ClientResult<Vec<MeetingRecord>> {
        self.get("/meetings").await
    }

    async fn schedule_meeting(&self, input: &NewMeeting) -> ClientResult<MeetingRecord> {
        self.post("/meetings", input).await
    }

    async fn update_meeting_status(
        &self,
        id: DbId,
        status: MeetingStatus,
    ) -> ClientResult<MeetingRecord> {
        self.put(&format!("/meetings/{id}/status"), &StatusUpdate { status })
            .await
    }

    async fn list_notifications(&self) -> ClientResult<Vec<NotificationRecord>> {
        self.get("/notifications").await
    }

    async fn mark_notification_read(&self, id: DbId) -> ClientResult<NotificationRecord> {
        self.put_empty(&format!("/notifications/{id}/read")).await
    }

    async fn mark_all_notifications_read(&self) -> ClientResult<u64> {
        self.put_empty::<MarkedRead>("/notifications/read-all")
            .await
            .map(|m| m.marked_read)
    }
}
