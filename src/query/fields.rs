//! Queryable field tables for each entity kind

use serde_json::{json, Value};

use super::filters::Queryable;
use crate::model::{AuditLog, Category, Item, Tag, User};

impl Queryable for User {
    fn filter_field(&self, key: &str, expected: &str) -> Option<bool> {
        match key {
            "role" => Some(self.role.as_str() == expected),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.username.as_str(), self.email.as_str()]
    }

    fn sort_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(json!(self.id)),
            "username" => Some(json!(self.username)),
            "email" => Some(json!(self.email)),
            "role" => Some(json!(self.role.as_str())),
            "created_at" => Some(json!(self.created_at.timestamp_micros())),
            "updated_at" => Some(json!(self.updated_at.timestamp_micros())),
            _ => None,
        }
    }

    fn redacted(&self) -> Self {
        User::redacted(self)
    }
}

impl Queryable for Item {
    fn filter_field(&self, key: &str, expected: &str) -> Option<bool> {
        match key {
            "category_id" => Some(self.category_id == expected),
            "tag" => Some(self.has_tag(expected)),
            "created_by" => Some(self.created_by == expected),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn sort_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(json!(self.id)),
            "name" => Some(json!(self.name)),
            "price" => Some(json!(self.price)),
            "category_id" => Some(json!(self.category_id)),
            "created_by" => Some(json!(self.created_by)),
            "created_at" => Some(json!(self.created_at.timestamp_micros())),
            "updated_at" => Some(json!(self.updated_at.timestamp_micros())),
            _ => None,
        }
    }

    fn redacted(&self) -> Self {
        self.clone()
    }
}

impl Queryable for Category {
    fn filter_field(&self, key: &str, expected: &str) -> Option<bool> {
        match key {
            "created_by" => Some(self.created_by == expected),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn sort_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(json!(self.id)),
            "name" => Some(json!(self.name)),
            "created_at" => Some(json!(self.created_at.timestamp_micros())),
            _ => None,
        }
    }

    fn redacted(&self) -> Self {
        self.clone()
    }
}

impl Queryable for Tag {
    fn filter_field(&self, key: &str, expected: &str) -> Option<bool> {
        match key {
            "created_by" => Some(self.created_by == expected),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn sort_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(json!(self.id)),
            "name" => Some(json!(self.name)),
            "created_at" => Some(json!(self.created_at.timestamp_micros())),
            _ => None,
        }
    }

    fn redacted(&self) -> Self {
        self.clone()
    }
}

impl Queryable for AuditLog {
    fn filter_field(&self, key: &str, expected: &str) -> Option<bool> {
        match key {
            "action" => Some(self.action.as_str() == expected),
            "entity" => Some(self.entity.as_str() == expected),
            "entity_id" => Some(self.entity_id == expected),
            "user_id" => Some(self.user_id == expected),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.details.as_str()]
    }

    fn sort_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(json!(self.id)),
            "action" => Some(json!(self.action.as_str())),
            "timestamp" => Some(json!(self.timestamp.timestamp_micros())),
            _ => None,
        }
    }

    fn redacted(&self) -> Self {
        self.clone()
    }
}
