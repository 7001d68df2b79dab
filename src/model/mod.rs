//! Catalog entities
//!
//! Every entity carries an opaque string id (UUID v4) assigned when the
//! value is constructed. The store never generates or rewrites ids.

mod analytics;
mod audit_log;
mod item;
mod taxonomy;
mod user;

pub use analytics::{Analytics, PopularEntry};
pub use audit_log::{AuditAction, AuditLog};
pub use item::Item;
pub use taxonomy::{Category, Tag};
pub use user::{Role, User};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a fresh entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The kinds of entity the catalog knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Item,
    Category,
    Tag,
    AuditLog,
    Analytics,
}

impl EntityKind {
    /// Returns the wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Item => "item",
            EntityKind::Category => "category",
            EntityKind::Tag => "tag",
            EntityKind::AuditLog => "audit_log",
            EntityKind::Analytics => "analytics",
        }
    }

    /// Returns the name of the collection holding this kind
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Item => "items",
            EntityKind::Category => "categories",
            EntityKind::Tag => "tags",
            EntityKind::AuditLog => "audit_logs",
            EntityKind::Analytics => "analytics",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
