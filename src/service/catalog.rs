//! Catalog service
//!
//! Everything the store deliberately does not do: input validation,
//! username uniqueness, password digests, ownership and role checks, and
//! audit emission. Callers pass an [`Actor`] they have already resolved.
//!
//! User records never leave this layer with their password digest intact.

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::credentials::{hash_password, verify_password};
use super::errors::{ServiceError, ServiceResult};
use super::validation::{validate_item, validate_name, validate_registration};
use crate::config::{AdminConfig, FeaturesConfig};
use crate::model::{
    Analytics, AuditAction, AuditLog, Category, EntityKind, Item, Role, Tag, User,
};
use crate::observability::{log_event_with_fields, AuditRecorder, AuditStats, Event};
use crate::query::{Page, PageRequest};
use crate::storage::{RecordStore, StoreError};

/// Audit entries returned when the caller gives no usable limit
pub const DEFAULT_AUDIT_LIMIT: i64 = 50;

/// Caller-supplied item fields, for both create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Default::default()
        }
    }
}

/// Which collections a search covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Users,
    Items,
    #[default]
    All,
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(SearchScope::Users),
            "items" => Ok(SearchScope::Items),
            "all" | "" => Ok(SearchScope::All),
            other => Err(format!("invalid search scope '{}'", other)),
        }
    }
}

/// Search hits per collection; collections outside the scope stay empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub users: Vec<User>,
    pub items: Vec<Item>,
}

/// Validation and policy over the record store
pub struct CatalogService {
    store: Arc<RecordStore>,
    audit: AuditRecorder,
    features: FeaturesConfig,
    /// Serializes the username check with the insert
    accounts: Mutex<()>,
}

impl CatalogService {
    /// Creates the service, starting an audit worker if auditing is enabled
    pub fn new(store: Arc<RecordStore>, features: FeaturesConfig) -> Self {
        let audit = if features.audit {
            AuditRecorder::spawn(store.clone())
        } else {
            AuditRecorder::disabled()
        };
        Self {
            store,
            audit,
            features,
            accounts: Mutex::new(()),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Waits for queued audit entries to be written
    pub fn flush_audit(&self) {
        self.audit.flush();
    }

    /// Drains and stops the audit worker
    pub fn shutdown(&self) -> AuditStats {
        self.audit.shutdown()
    }

    fn record(
        &self,
        actor_id: &str,
        action: AuditAction,
        entity: EntityKind,
        entity_id: &str,
        details: &str,
    ) {
        self.audit
            .record(actor_id, action, entity, entity_id, details);
    }

    // ==================
    // Accounts
    // ==================

    /// Creates a `user`-role account
    pub fn register(&self, username: &str, password: &str, email: &str) -> ServiceResult<User> {
        validate_registration(username, password, email)?;
        let user = User::new(username, hash_password(password)?, email, Role::User);

        {
            let _accounts = self.lock_accounts()?;
            self.ensure_username_free(username)?;
            self.store.create(user.clone())?;
        }

        self.record(&user.id, AuditAction::Create, EntityKind::User, &user.id, "registered");
        Ok(user.redacted())
    }

    fn lock_accounts(&self) -> ServiceResult<MutexGuard<'_, ()>> {
        Ok(self.accounts.lock().map_err(|_| StoreError::lock_poisoned())?)
    }

    fn ensure_username_free(&self, username: &str) -> ServiceResult<()> {
        match self.store.get_user_by_username(username) {
            Ok(_) => Err(ServiceError::Conflict("Username already taken".to_string())),
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Checks a username and password pair
    pub fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        if username.is_empty() || password.is_empty() {
            return Err(ServiceError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let user = match self.store.get_user_by_username(username) {
            Ok(user) => user,
            Err(err) if err.is_not_found() => return Err(ServiceError::InvalidCredentials),
            Err(err) => return Err(err.into()),
        };

        if !verify_password(password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        self.record(&user.id, AuditAction::Access, EntityKind::User, &user.id, "login");
        Ok(user.redacted())
    }

    /// Seeds the configured admin account unless that username exists.
    ///
    /// Returns the new account, or `None` if nothing was created.
    pub fn ensure_default_admin(&self, admin: &AdminConfig) -> ServiceResult<Option<User>> {
        let accounts = self.lock_accounts()?;
        match self.store.get_user_by_username(&admin.username) {
            Ok(_) => return Ok(None),
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err.into()),
        }

        let user = User::new(
            admin.username.as_str(),
            hash_password(&admin.password)?,
            admin.email.as_str(),
            Role::Admin,
        );
        self.store.create(user.clone())?;
        drop(accounts);

        log_event_with_fields(
            Event::AdminSeeded,
            &[("user_id", user.id.as_str()), ("username", user.username.as_str())],
        );
        self.record(&user.id, AuditAction::Create, EntityKind::User, &user.id, "default admin");
        Ok(Some(user.redacted()))
    }

    /// Looks up the acting user
    pub fn resolve_actor(&self, user_id: &str) -> ServiceResult<Actor> {
        match self.store.get::<User>(user_id) {
            Ok(user) => Ok(Actor::from(&user)),
            Err(err) if err.is_not_found() => Err(ServiceError::InvalidCredentials),
            Err(err) => Err(err.into()),
        }
    }

    pub fn get_user(&self, id: &str) -> ServiceResult<User> {
        Ok(self.store.get::<User>(id)?.redacted())
    }

    pub fn list_users(&self, request: &PageRequest) -> ServiceResult<Page<User>> {
        Ok(self.store.query::<User>(request)?)
    }

    /// Changes a user's role (admins only)
    pub fn set_user_role(&self, actor: &Actor, user_id: &str, role: Role) -> ServiceResult<User> {
        if !actor.is_admin() {
            return Err(ServiceError::Forbidden(
                "Only admins can change roles".to_string(),
            ));
        }

        let user = self.store.update_user_role(user_id, role)?;
        self.record(
            &actor.user_id,
            AuditAction::Update,
            EntityKind::User,
            user_id,
            &format!("role set to {}", role),
        );
        Ok(user.redacted())
    }

    // ==================
    // Items
    // ==================

    pub fn create_item(&self, actor: &Actor, draft: ItemDraft) -> ServiceResult<Item> {
        validate_item(&draft.name, draft.price)?;

        let item = Item::new(draft.name, draft.description, draft.price, &actor.user_id)
            .with_category(draft.category_id)
            .with_tags(draft.tags)
            .with_image(draft.image_url);
        self.store.create(item.clone())?;

        self.record(&actor.user_id, AuditAction::Create, EntityKind::Item, &item.id, &item.name);
        Ok(item)
    }

    /// Replaces an item's editable fields (creator only)
    pub fn update_item(&self, actor: &Actor, id: &str, draft: ItemDraft) -> ServiceResult<Item> {
        let mut item = self.store.get::<Item>(id)?;
        validate_item(&draft.name, draft.price)?;

        if !actor.owns(&item.created_by) {
            return Err(ServiceError::Forbidden(
                "You don't have permission to update this item".to_string(),
            ));
        }

        item.name = draft.name;
        item.description = draft.description;
        item.price = draft.price;
        item.category_id = draft.category_id;
        item.set_tags(draft.tags);
        item.image_url = draft.image_url;

        let item = self.store.update(item)?;
        self.record(&actor.user_id, AuditAction::Update, EntityKind::Item, &item.id, &item.name);
        Ok(item)
    }

    /// Removes an item (creator or admin)
    pub fn delete_item(&self, actor: &Actor, id: &str) -> ServiceResult<()> {
        let item = self.store.get::<Item>(id)?;
        if !actor.can_manage(&item.created_by) {
            return Err(ServiceError::Forbidden(
                "You don't have permission to delete this item".to_string(),
            ));
        }

        self.store.delete::<Item>(id)?;
        self.record(&actor.user_id, AuditAction::Delete, EntityKind::Item, id, &item.name);
        Ok(())
    }

    pub fn get_item(&self, id: &str) -> ServiceResult<Item> {
        Ok(self.store.get::<Item>(id)?)
    }

    pub fn list_items(&self, request: &PageRequest) -> ServiceResult<Page<Item>> {
        Ok(self.store.query::<Item>(request)?)
    }

    /// Items carrying an existing tag
    pub fn items_by_tag(&self, tag_id: &str) -> ServiceResult<Vec<Item>> {
        self.store.get::<Tag>(tag_id)?;
        Ok(self.store.items_by_tag(tag_id)?)
    }

    /// Items in an existing category
    pub fn items_by_category(&self, category_id: &str) -> ServiceResult<Vec<Item>> {
        self.store.get::<Category>(category_id)?;
        Ok(self.store.items_by_category(category_id)?)
    }

    // ==================
    // Categories
    // ==================

    pub fn create_category(
        &self,
        actor: &Actor,
        name: &str,
        description: &str,
    ) -> ServiceResult<Category> {
        validate_name("Category", name)?;

        let category = Category::new(name, description, actor.user_id.as_str());
        self.store.create(category.clone())?;

        self.record(&actor.user_id, AuditAction::Create, EntityKind::Category, &category.id, name);
        Ok(category)
    }

    /// Renames or redescribes a category (creator or admin)
    pub fn update_category(
        &self,
        actor: &Actor,
        id: &str,
        name: &str,
        description: &str,
    ) -> ServiceResult<Category> {
        let mut category = self.store.get::<Category>(id)?;
        validate_name("Category", name)?;

        if !actor.can_manage(&category.created_by) {
            return Err(ServiceError::Forbidden(
                "You don't have permission to update this category".to_string(),
            ));
        }

        category.name = name.to_string();
        category.description = description.to_string();

        let category = self.store.update(category)?;
        self.record(&actor.user_id, AuditAction::Update, EntityKind::Category, id, name);
        Ok(category)
    }

    /// Removes a category (creator or admin). Items keep the dangling id.
    pub fn delete_category(&self, actor: &Actor, id: &str) -> ServiceResult<()> {
        let category = self.store.get::<Category>(id)?;
        if !actor.can_manage(&category.created_by) {
            return Err(ServiceError::Forbidden(
                "You don't have permission to delete this category".to_string(),
            ));
        }

        self.store.delete::<Category>(id)?;
        self.record(&actor.user_id, AuditAction::Delete, EntityKind::Category, id, &category.name);
        Ok(())
    }

    pub fn get_category(&self, id: &str) -> ServiceResult<Category> {
        Ok(self.store.get::<Category>(id)?)
    }

    pub fn list_categories(&self, request: &PageRequest) -> ServiceResult<Page<Category>> {
        Ok(self.store.query::<Category>(request)?)
    }

    // ==================
    // Tags
    // ==================

    pub fn create_tag(&self, actor: &Actor, name: &str) -> ServiceResult<Tag> {
        validate_name("Tag", name)?;

        let tag = Tag::new(name, actor.user_id.as_str());
        self.store.create(tag.clone())?;

        self.record(&actor.user_id, AuditAction::Create, EntityKind::Tag, &tag.id, name);
        Ok(tag)
    }

    /// Removes a tag (creator or admin). Items keep the dangling id.
    pub fn delete_tag(&self, actor: &Actor, id: &str) -> ServiceResult<()> {
        let tag = self.store.get::<Tag>(id)?;
        if !actor.can_manage(&tag.created_by) {
            return Err(ServiceError::Forbidden(
                "You don't have permission to delete this tag".to_string(),
            ));
        }

        self.store.delete::<Tag>(id)?;
        self.record(&actor.user_id, AuditAction::Delete, EntityKind::Tag, id, &tag.name);
        Ok(())
    }

    pub fn get_tag(&self, id: &str) -> ServiceResult<Tag> {
        Ok(self.store.get::<Tag>(id)?)
    }

    pub fn list_tags(&self, request: &PageRequest) -> ServiceResult<Page<Tag>> {
        Ok(self.store.query::<Tag>(request)?)
    }

    // ==================
    // Search, analytics, audit
    // ==================

    /// Case-insensitive substring search. An empty query is rejected.
    pub fn search(&self, query: &str, scope: SearchScope) -> ServiceResult<SearchResults> {
        if query.is_empty() {
            return Err(ServiceError::Validation(
                "Search query is required".to_string(),
            ));
        }

        let mut results = SearchResults::default();
        if matches!(scope, SearchScope::Users | SearchScope::All) {
            results.users = self.store.search::<User>(query)?;
        }
        if matches!(scope, SearchScope::Items | SearchScope::All) {
            results.items = self.store.search::<Item>(query)?;
        }
        Ok(results)
    }

    fn require_analytics(&self) -> ServiceResult<()> {
        if self.features.analytics {
            Ok(())
        } else {
            Err(ServiceError::Disabled("analytics"))
        }
    }

    /// Cached analytics, as of the last refresh
    pub fn analytics(&self) -> ServiceResult<Analytics> {
        self.require_analytics()?;
        Ok(self.store.analytics()?)
    }

    /// Recomputes and returns analytics
    pub fn refresh_analytics(&self) -> ServiceResult<Analytics> {
        self.require_analytics()?;
        Ok(self.store.refresh_analytics()?)
    }

    /// Most recent audit entries. Missing or non-positive limits mean 50.
    pub fn audit_logs(&self, limit: Option<i64>) -> ServiceResult<Vec<AuditLog>> {
        let limit = match limit {
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_AUDIT_LIMIT,
        };
        Ok(self.store.audit_logs(limit)?)
    }
}
