//! Cached analytics snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A category or tag together with how many items reference it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularEntry {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Point-in-time summary of the store.
///
/// Stale until explicitly refreshed; `updated_at` is the only staleness
/// signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_users: usize,
    pub total_items: usize,
    pub total_categories: usize,
    pub total_tags: usize,
    #[serde(default)]
    pub popular_categories: Vec<PopularEntry>,
    #[serde(default)]
    pub popular_tags: Vec<PopularEntry>,
    #[serde(default)]
    pub recent_activities: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Analytics {
    /// All-zero analytics stamped at `now`
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            total_users: 0,
            total_items: 0,
            total_categories: 0,
            total_tags: 0,
            popular_categories: Vec::new(),
            popular_tags: Vec::new(),
            recent_activities: Vec::new(),
            updated_at: now,
        }
    }

    /// Names of the popular categories, most referenced first
    pub fn popular_category_names(&self) -> Vec<&str> {
        self.popular_categories.iter().map(|e| e.name.as_str()).collect()
    }

    /// Names of the popular tags, most referenced first
    pub fn popular_tag_names(&self) -> Vec<&str> {
        self.popular_tags.iter().map(|e| e.name.as_str()).collect()
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::empty(Utc::now())
    }
}
