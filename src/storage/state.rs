//! In-memory store state and its persisted layout
//!
//! The snapshot document is exactly this struct serialized: five
//! collections keyed by id plus the cached analytics object. There is no
//! version field.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{Analytics, AuditLog, Category, Item, Tag, User};

/// The full store contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub users: HashMap<String, User>,
    #[serde(default)]
    pub items: HashMap<String, Item>,
    #[serde(default)]
    pub categories: HashMap<String, Category>,
    #[serde(default)]
    pub tags: HashMap<String, Tag>,
    #[serde(default)]
    pub audit_logs: HashMap<String, AuditLog>,
    #[serde(default)]
    pub analytics: Analytics,
}

impl StoreState {
    /// Empty collections, analytics stamped now
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            items: HashMap::new(),
            categories: HashMap::new(),
            tags: HashMap::new(),
            audit_logs: HashMap::new(),
            analytics: Analytics::empty(Utc::now()),
        }
    }

    /// Indentation-formatted JSON document
    pub fn to_pretty_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    /// Parses a snapshot document
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}
