//! The identity a request acts as

use serde::{Deserialize, Serialize};

use crate::model::{Role, User};

/// An already-resolved caller identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this actor created a record owned by `owner_id`
    pub fn owns(&self, owner_id: &str) -> bool {
        self.user_id == owner_id
    }

    /// Owner or admin
    pub fn can_manage(&self, owner_id: &str) -> bool {
        self.owns(owner_id) || self.is_admin()
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id.clone(), user.role)
    }
}
