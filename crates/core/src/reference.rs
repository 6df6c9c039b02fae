//! Foreign-key references that are either a bare id or a populated record.
//!
//! List endpoints populate the people a record points at; mutation
//! responses return bare ids. Both shapes deserialize into [`Ref`], and
//! consumers read the id through [`Ref::id`] instead of probing the JSON.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::DbId;

/// Anything with a primary key.
pub trait Identified {
    fn id(&self) -> DbId;
}

/// A reference to another record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(DbId),
    Populated(T),
}

impl<T: Identified> Ref<T> {
    /// The referenced id, whichever shape this is.
    pub fn id(&self) -> DbId {
        match self {
            Ref::Id(id) => *id,
            Ref::Populated(value) => value.id(),
        }
    }

    /// Populate from `lookup`, keeping the bare id if the record is unknown.
    pub fn resolve(id: DbId, lookup: impl FnOnce(DbId) -> Option<T>) -> Self {
        lookup(id).map_or(Ref::Id(id), Ref::Populated)
    }
}

impl<T> Ref<T> {
    pub fn populated(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Populated(value) => Some(value),
        }
    }
}

/// Public identity of a user, used when references are populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub profile_picture: Option<String>,
}

impl Identified for UserSummary {
    fn id(&self) -> DbId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> UserSummary {
        UserSummary {
            id: 5,
            name: "Jane Roe".into(),
            email: "janeroe@company.com".into(),
            role: Role::Hr,
            profile_picture: None,
        }
    }

    #[test]
    fn both_shapes_deserialize() {
        let bare: Ref<UserSummary> = serde_json::from_str("5").unwrap();
        assert_eq!(bare.id(), 5);
        assert!(bare.populated().is_none());

        let json = serde_json::to_string(&jane()).unwrap();
        let full: Ref<UserSummary> = serde_json::from_str(&json).unwrap();
        assert_eq!(full.id(), 5);
        assert_eq!(full.populated().map(|u| u.name.as_str()), Some("Jane Roe"));
    }

    #[test]
    fn resolve_falls_back_to_id() {
        let r = Ref::resolve(9, |_| None::<UserSummary>);
        assert_eq!(r, Ref::Id(9));
        let r = Ref::resolve(5, |_| Some(jane()));
        assert!(r.populated().is_some());
    }
}
