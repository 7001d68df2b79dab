//! Audit log entries
//!
//! Entries are append-only: created once, never updated or deleted through
//! normal operation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, EntityKind};

/// What the actor did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Read,
    Update,
    Delete,
    Access,
}

impl AuditAction {
    /// Returns the wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Read => "read",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Access => "access",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub action: AuditAction,
    /// Kind of the entity acted upon
    pub entity: EntityKind,
    pub entity_id: String,
    /// Acting user id
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: String,
}

impl AuditLog {
    /// Create a new entry with a fresh id, stamped now
    pub fn new(
        action: AuditAction,
        entity: EntityKind,
        entity_id: impl Into<String>,
        user_id: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            action,
            entity,
            entity_id: entity_id.into(),
            user_id: user_id.into(),
            timestamp: Utc::now(),
            details: details.into(),
        }
    }

    /// Renders the entry as a one-line activity description.
    ///
    /// `actor` is the display name of `user_id`.
    pub fn describe(&self, actor: &str) -> String {
        let mut line = format!(
            "{} {} {} {}",
            actor, self.action, self.entity, self.entity_id
        );
        if !self.details.is_empty() {
            line.push_str(": ");
            line.push_str(&self.details);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let log = AuditLog::new(AuditAction::Create, EntityKind::Item, "i1", "u1", "");
        assert_eq!(log.describe("alice"), "alice create item i1");

        let log = AuditLog::new(
            AuditAction::Delete,
            EntityKind::Tag,
            "t9",
            "u1",
            "removed by admin",
        );
        assert_eq!(log.describe("root"), "root delete tag t9: removed by admin");
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(
            serde_json::to_string(&AuditAction::Access).unwrap(),
            "\"access\""
        );
    }
}
