use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const ADMIN_AUTHORITY: &str = "ROLE_ADMIN";

/// Authenticated principal with the groups and authorities used for course roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing)]
    pub groups: BTreeSet<String>,
    #[serde(default, skip_serializing)]
    pub authorities: BTreeSet<String>,
}

impl User {
    pub fn new(id: i64, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            name: None,
            groups: BTreeSet::new(),
            authorities: BTreeSet::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authorities.insert(authority.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.authorities.contains(ADMIN_AUTHORITY)
    }

    pub fn is_member_of(&self, group: Option<&str>) -> bool {
        group.map_or(false, |g| self.groups.contains(g))
    }
}
