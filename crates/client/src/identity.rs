//! Signed-in user plus the roster of people they can see.
//!
//! The roster is refetched on login and after every user mutation instead
//! of being patched, so server-side scoping and salary hiding always win.

use std::sync::Arc;

use hrflow_core::records::PublicUser;
use hrflow_core::roles::Role;
use hrflow_core::types::DbId;

use crate::api::{CreatedUser, HrApi};
use crate::error::{ClientError, ClientResult};
use crate::requests::{NewUser, UserPatch};

pub struct IdentityContext<A: HrApi> {
    api: Arc<A>,
    current: Option<PublicUser>,
    roster: Vec<PublicUser>,
}

impl<A: HrApi> IdentityContext<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            current: None,
            roster: Vec::new(),
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<&PublicUser> {
        let session = self.api.login(email, password).await?;
        self.current = Some(session.user);
        self.refresh_roster().await?;
        self.current_or_unauthenticated()
    }

    pub async fn logout(&mut self) -> ClientResult<()> {
        let result = self.api.logout().await;
        self.clear();
        result
    }

    /// Re-read the current user and the roster, e.g. after restoring a token.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let result = self.api.me().await;
        let me = self.guard(result)?;
        self.current = Some(me);
        self.refresh_roster().await
    }

    pub async fn create_user(&mut self, input: &NewUser) -> ClientResult<CreatedUser> {
        let result = self.api.create_user(input).await;
        let created = self.guard(result)?;
        self.refresh_roster().await?;
        Ok(created)
    }

    pub async fn update_user(&mut self, id: DbId, patch: &UserPatch) -> ClientResult<PublicUser> {
        let result = self.api.update_user(id, patch).await;
        let updated = self.guard(result)?;
        if self.current_id() == Some(id) {
            self.current = Some(updated.clone());
        }
        self.refresh_roster().await?;
        Ok(updated)
    }

    pub async fn delete_user(&mut self, id: DbId) -> ClientResult<()> {
        let result = self.api.delete_user(id).await;
        self.guard(result)?;
        self.refresh_roster().await
    }

    async fn refresh_roster(&mut self) -> ClientResult<()> {
        let result = self.api.list_users().await;
        self.roster = self.guard(result)?;
        Ok(())
    }

    /// Drop local state when the server no longer accepts the session.
    fn guard<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            if e.is_unauthenticated() {
                tracing::debug!("Session rejected, clearing identity");
                self.clear();
            }
        }
        result
    }

    fn clear(&mut self) {
        self.current = None;
        self.roster.clear();
    }

    fn current_or_unauthenticated(&self) -> ClientResult<&PublicUser> {
        self.current
            .as_ref()
            .ok_or_else(|| ClientError::Unauthenticated("Not signed in".into()))
    }

    // ========== Views ==========

    pub fn current_user(&self) -> Option<&PublicUser> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<DbId> {
        self.current.as_ref().map(|u| u.id)
    }

    pub fn role(&self) -> Option<Role> {
        self.current.as_ref().map(|u| u.role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Everyone the server lets the current user see.
    pub fn roster(&self) -> &[PublicUser] {
        &self.roster
    }

    pub fn user(&self, id: DbId) -> Option<&PublicUser> {
        self.roster.iter().find(|u| u.id == id)
    }

    pub fn users_with_role(&self, role: Role) -> impl Iterator<Item = &PublicUser> + '_ {
        self.roster.iter().filter(move |u| u.role == role)
    }

    /// Accounts created by `manager_id`.
    pub fn managed_by(&self, manager_id: DbId) -> impl Iterator<Item = &PublicUser> + '_ {
        self.roster
            .iter()
            .filter(move |u| u.created_by == Some(manager_id))
    }

    /// Roster entries other than the current user, for pickers.
    pub fn peers(&self) -> impl Iterator<Item = &PublicUser> + '_ {
        let me = self.current_id();
        self.roster.iter().filter(move |u| Some(u.id) != me)
    }

    pub fn display_name(&self, id: DbId) -> Option<&str> {
        self.user(id)
            .or_else(|| self.current.as_ref().filter(|u| u.id == id))
            .map(|u| u.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user, FakeApi};
    use assert_matches::assert_matches;

    fn org() -> Vec<PublicUser> {
        vec![
            user(1, "Ada Admin", Role::Admin, None),
            user(2, "Helen Hr", Role::Hr, Some(1)),
            user(3, "Evan Employee", Role::Employee, Some(2)),
            user(4, "Erin Employee", Role::Employee, Some(2)),
        ]
    }

    #[tokio::test]
    async fn login_loads_roster() {
        let api = Arc::new(FakeApi::with_users(org()));
        let mut identity = IdentityContext::new(api.clone());

        let me = identity.login("helenhr@company.com", "pw").await.unwrap();
        assert_eq!(me.id, 2);
        assert_eq!(identity.roster().len(), 4);
        assert_eq!(identity.role(), Some(Role::Hr));

        let managed: Vec<DbId> = identity.managed_by(2).map(|u| u.id).collect();
        assert_eq!(managed, [3, 4]);
        assert_eq!(identity.peers().count(), 3);
        assert_eq!(identity.users_with_role(Role::Employee).count(), 2);
        assert_eq!(identity.display_name(4), Some("Erin Employee"));
    }

    #[tokio::test]
    async fn user_mutations_refetch_roster() {
        let api = Arc::new(FakeApi::with_users(org()));
        let mut identity = IdentityContext::new(api.clone());
        identity.login("helenhr@company.com", "pw").await.unwrap();
        let before = api.calls("list_users");

        let created = identity.create_user(&NewUser::named("Nia New")).await.unwrap();
        assert_eq!(created.credentials.email, "nianew@company.com");
        assert!(identity.user(created.user.id).is_some());

        identity.delete_user(created.user.id).await.unwrap();
        assert!(identity.user(created.user.id).is_none());
        assert_eq!(api.calls("list_users"), before + 2);
    }

    #[tokio::test]
    async fn updating_self_refreshes_current_user() {
        let api = Arc::new(FakeApi::with_users(org()));
        let mut identity = IdentityContext::new(api);
        identity.login("helenhr@company.com", "pw").await.unwrap();

        let patch = UserPatch {
            name: Some("Helen Hart".into()),
            ..UserPatch::default()
        };
        identity.update_user(2, &patch).await.unwrap();
        assert_eq!(identity.current_user().unwrap().name, "Helen Hart");
        assert_eq!(identity.display_name(2), Some("Helen Hart"));
    }

    #[tokio::test]
    async fn rejected_session_clears_identity() {
        let api = Arc::new(FakeApi::with_users(org()));
        let mut identity = IdentityContext::new(api.clone());
        identity.login("helenhr@company.com", "pw").await.unwrap();

        api.expire_session();
        let err = identity.refresh().await.unwrap_err();
        assert!(err.is_unauthenticated());
        assert!(!identity.is_signed_in());
        assert!(identity.roster().is_empty());
    }

    #[tokio::test]
    async fn other_errors_keep_the_session() {
        let api = Arc::new(FakeApi::with_users(org()));
        let mut identity = IdentityContext::new(api);
        identity.login("helenhr@company.com", "pw").await.unwrap();

        let err = identity.delete_user(999).await.unwrap_err();
        assert_matches!(err, ClientError::NotFound(_));
        assert!(identity.is_signed_in());
    }

    #[tokio::test]
    async fn logout_clears_state() {
        let api = Arc::new(FakeApi::with_users(org()));
        let mut identity = IdentityContext::new(api);
        identity.login("helenhr@company.com", "pw").await.unwrap();

        identity.logout().await.unwrap();
        assert!(identity.current_user().is_none());
        assert!(identity.roster().is_empty());
    }
}
