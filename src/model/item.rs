//! Catalog items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// A catalog item
///
/// `category_id` and `tags` are plain references; nothing checks that the
/// referenced category or tags exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Non-negative; checked by the caller, not the store
    pub price: f64,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Id of the creating user
    pub created_by: String,
}

impl Item {
    /// Create a new uncategorised, untagged item with a fresh id
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            description: description.into(),
            price,
            category_id: String::new(),
            tags: Vec::new(),
            image_url: String::new(),
            created_at: now,
            updated_at: now,
            created_by: created_by.into(),
        }
    }

    /// Set the owning category
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = category_id.into();
        self
    }

    /// Set the tag ids
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_tags(tags);
        self
    }

    /// Replace the tag ids. Repeats are dropped, first occurrence wins.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.clear();
        for tag in tags {
            let tag = tag.into();
            if !self.has_tag(&tag) {
                self.tags.push(tag);
            }
        }
    }

    /// Set the image reference
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Returns true if the item references the tag
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| t == tag_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let item = Item::new("Lamp", "Desk lamp", 19.5, "u1")
            .with_category("c1")
            .with_tags(["t1", "t2"])
            .with_image("/img/lamp.png");

        assert_eq!(item.category_id, "c1");
        assert!(item.has_tag("t2"));
        assert!(!item.has_tag("t3"));
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn test_tags_are_a_set() {
        let mut item = Item::new("Lamp", "", 5.0, "u1").with_tags(["t1", "t2", "t1"]);
        assert_eq!(item.tags, vec!["t1", "t2"]);

        item.set_tags(["t3", "t3"]);
        assert_eq!(item.tags, vec!["t3"]);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = serde_json::json!({
            "id": "i1",
            "name": "Lamp",
            "price": 1.0,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "created_by": "u1"
        });
        let item: Item = serde_json::from_value(json).unwrap();
        assert!(item.tags.is_empty());
        assert!(item.category_id.is_empty());
    }
}
