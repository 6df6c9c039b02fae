//! Populates user references on list responses.

use std::collections::HashMap;

use hrflow_core::records::UserRef;
use hrflow_core::reference::{Ref, UserSummary};
use hrflow_core::types::DbId;
use hrflow_db::Store;

use crate::error::AppResult;

/// Summaries of the users a batch of records points at.
///
/// Loaded with one store call per response. Ids that no longer resolve
/// stay bare.
#[derive(Debug, Default)]
pub struct Directory {
    users: HashMap<DbId, UserSummary>,
}

impl Directory {
    pub async fn load(
        store: &dyn Store,
        ids: impl IntoIterator<Item = DbId>,
    ) -> AppResult<Self> {
        let mut ids: Vec<DbId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();

        let users = store
            .find_users(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.summary()))
            .collect();
        Ok(Self { users })
    }

    pub fn user(&self, id: DbId) -> UserRef {
        Ref::resolve(id, |id| self.users.get(&id).cloned())
    }
}
