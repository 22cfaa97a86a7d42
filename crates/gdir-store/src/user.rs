//! User documents

use std::fmt;

use gdir_acl::{AccessState, AclError};
use serde::{Deserialize, Serialize};

/// A login for the file index, with its drive access-control lists.
///
/// Stored as JSON inside a `user` record. At most one of the two drive lists
/// is non-empty; both empty means full access.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,

    #[serde(rename = "pass")]
    pub password: String,

    #[serde(
        rename = "drivesAllowList",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub allow_list: Vec<String>,

    #[serde(
        rename = "drivesBlockList",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub block_list: Vec<String>,
}

impl User {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// The user's access-control state.
    ///
    /// Fails if a document somehow carries both lists.
    pub fn access(&self) -> Result<AccessState, AclError> {
        AccessState::from_lists(self.allow_list.clone(), self.block_list.clone())
    }

    /// Replace both lists from an access-control state.
    pub fn set_access(&mut self, state: AccessState) {
        let (allow, block) = state.into_lists();
        self.allow_list = allow;
        self.block_list = block;
    }

    pub fn with_access(mut self, state: AccessState) -> Self {
        self.set_access(state);
        self
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("allow_list", &self.allow_list)
            .field("block_list", &self.block_list)
            .finish()
    }
}
