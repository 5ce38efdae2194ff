//! Session state supplied by the authentication collaborator.

use serde::{Deserialize, Serialize};

use crate::security::permissions::PermissionSet;

/// The current principal, as far as routing cares.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Logged-in user name; `None` for anonymous sessions.
    pub user: Option<String>,
    /// Keys granted to the user.
    #[serde(default)]
    pub permissions: PermissionSet,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            user: Some(user.into()),
            permissions,
        }
    }

    pub fn is_login(&self) -> bool {
        self.user.is_some()
    }
}
