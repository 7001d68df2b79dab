//! The `Record` trait binds each entity type to its collection
//!
//! Generic store operations (`get`, `create`, `update`, ...) are written
//! once against this trait.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::state::StoreState;
use crate::model::{AuditLog, Category, EntityKind, Item, Tag, User};

/// An entity stored in one of the store's collections
pub trait Record: Clone + Send + Sync + 'static {
    /// Kind of entity, used for error context and audit entries
    const KIND: EntityKind;

    /// The record's id
    fn id(&self) -> &str;

    /// Refreshes the updated timestamp, for kinds that have one
    fn touch(&mut self, _now: DateTime<Utc>) {}

    /// Value of a named field as text, for field lookups.
    ///
    /// Unknown fields return `None` and never match.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;

    fn collection(state: &StoreState) -> &HashMap<String, Self>;

    fn collection_mut(state: &mut StoreState) -> &mut HashMap<String, Self>;
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Borrowed(&self.id)),
            "username" => Some(Cow::Borrowed(&self.username)),
            "email" => Some(Cow::Borrowed(&self.email)),
            "role" => Some(Cow::Borrowed(self.role.as_str())),
            _ => None,
        }
    }

    fn collection(state: &StoreState) -> &HashMap<String, Self> {
        &state.users
    }

    fn collection_mut(state: &mut StoreState) -> &mut HashMap<String, Self> {
        &mut state.users
    }
}

impl Record for Item {
    const KIND: EntityKind = EntityKind::Item;

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Borrowed(&self.id)),
            "name" => Some(Cow::Borrowed(&self.name)),
            "description" => Some(Cow::Borrowed(&self.description)),
            "category_id" => Some(Cow::Borrowed(&self.category_id)),
            "image_url" => Some(Cow::Borrowed(&self.image_url)),
            "created_by" => Some(Cow::Borrowed(&self.created_by)),
            "price" => Some(Cow::Owned(self.price.to_string())),
            _ => None,
        }
    }

    fn collection(state: &StoreState) -> &HashMap<String, Self> {
        &state.items
    }

    fn collection_mut(state: &mut StoreState) -> &mut HashMap<String, Self> {
        &mut state.items
    }
}

impl Record for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Borrowed(&self.id)),
            "name" => Some(Cow::Borrowed(&self.name)),
            "description" => Some(Cow::Borrowed(&self.description)),
            "created_by" => Some(Cow::Borrowed(&self.created_by)),
            _ => None,
        }
    }

    fn collection(state: &StoreState) -> &HashMap<String, Self> {
        &state.categories
    }

    fn collection_mut(state: &mut StoreState) -> &mut HashMap<String, Self> {
        &mut state.categories
    }
}

impl Record for Tag {
    const KIND: EntityKind = EntityKind::Tag;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Borrowed(&self.id)),
            "name" => Some(Cow::Borrowed(&self.name)),
            "created_by" => Some(Cow::Borrowed(&self.created_by)),
            _ => None,
        }
    }

    fn collection(state: &StoreState) -> &HashMap<String, Self> {
        &state.tags
    }

    fn collection_mut(state: &mut StoreState) -> &mut HashMap<String, Self> {
        &mut state.tags
    }
}

impl Record for AuditLog {
    const KIND: EntityKind = EntityKind::AuditLog;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Borrowed(&self.id)),
            "action" => Some(Cow::Borrowed(self.action.as_str())),
            "entity" => Some(Cow::Borrowed(self.entity.as_str())),
            "entity_id" => Some(Cow::Borrowed(&self.entity_id)),
            "user_id" => Some(Cow::Borrowed(&self.user_id)),
            _ => None,
        }
    }

    fn collection(state: &StoreState) -> &HashMap<String, Self> {
        &state.audit_logs
    }

    fn collection_mut(state: &mut StoreState) -> &mut HashMap<String, Self> {
        &mut state.audit_logs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn test_field_lookup() {
        let user = User::new("alice", "digest", "a@example.com", Role::Admin);
        assert_eq!(user.field("username").as_deref(), Some("alice"));
        assert_eq!(user.field("role").as_deref(), Some("admin"));
        assert!(user.field("password").is_none());
    }

    #[test]
    fn test_touch_only_moves_updated_at() {
        let mut item = Item::new("Lamp", "", 1.0, "u1");
        let created = item.created_at;
        let later = created + chrono::Duration::seconds(5);
        item.touch(later);
        assert_eq!(item.created_at, created);
        assert_eq!(item.updated_at, later);
    }
}
