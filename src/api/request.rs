//! API request types
//!
//! One JSON object per request, tagged by `op`. Operations on users, items,
//! categories and tags act as a known user and carry that user's id in
//! `actor_id`; the remaining operations are anonymous.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use crate::model::Role;
use crate::query::PageRequest;
use crate::service::{ItemDraft, SearchScope};

/// Every operation name `Request::parse` accepts
pub const OPERATIONS: &[&str] = &[
    "hello",
    "register",
    "login",
    "get_user",
    "list_users",
    "set_role",
    "create_item",
    "update_item",
    "delete_item",
    "get_item",
    "list_items",
    "create_category",
    "update_category",
    "delete_category",
    "list_categories",
    "create_tag",
    "delete_tag",
    "list_tags",
    "tag_items",
    "category_items",
    "search",
    "analytics",
    "refresh_analytics",
    "audit_logs",
];

/// Unified request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Hello,

    // Accounts
    Register {
        username: String,
        password: String,
        email: String,
    },
    Login {
        username: String,
        password: String,
    },
    GetUser {
        actor_id: String,
        id: String,
    },
    ListUsers {
        actor_id: String,
        #[serde(flatten)]
        page: PageRequest,
    },
    SetRole {
        actor_id: String,
        user_id: String,
        role: Role,
    },

    // Items
    CreateItem {
        actor_id: String,
        #[serde(flatten)]
        item: ItemDraft,
    },
    UpdateItem {
        actor_id: String,
        id: String,
        #[serde(flatten)]
        item: ItemDraft,
    },
    DeleteItem {
        actor_id: String,
        id: String,
    },
    GetItem {
        actor_id: String,
        id: String,
    },
    ListItems {
        actor_id: String,
        #[serde(flatten)]
        page: PageRequest,
    },

    // Categories
    CreateCategory {
        actor_id: String,
        name: String,
        #[serde(default)]
        description: String,
    },
    UpdateCategory {
        actor_id: String,
        id: String,
        name: String,
        #[serde(default)]
        description: String,
    },
    DeleteCategory {
        actor_id: String,
        id: String,
    },
    ListCategories {
        actor_id: String,
        #[serde(flatten)]
        page: PageRequest,
    },
    CategoryItems {
        actor_id: String,
        id: String,
    },

    // Tags
    CreateTag {
        actor_id: String,
        name: String,
    },
    DeleteTag {
        actor_id: String,
        id: String,
    },
    ListTags {
        actor_id: String,
        #[serde(flatten)]
        page: PageRequest,
    },
    TagItems {
        actor_id: String,
        id: String,
    },

    // Search, analytics, audit
    Search {
        #[serde(alias = "q", default)]
        query: String,
        #[serde(alias = "type", default)]
        scope: SearchScope,
    },
    Analytics,
    RefreshAnalytics,
    AuditLogs {
        #[serde(default)]
        limit: Option<i64>,
    },
}

impl Request {
    /// Parse a request from a JSON string
    pub fn parse(json: &str) -> ApiResult<Self> {
        let raw: Value = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;

        let op = raw
            .get("op")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::invalid_request("Missing op"))?;

        if !OPERATIONS.contains(&op) {
            return Err(ApiError::unknown_operation(op));
        }

        serde_json::from_value(raw.clone())
            .map_err(|e| ApiError::invalid_request(format!("Invalid {} request: {}", op, e)))
    }

    /// The `op` name of this request
    pub fn op(&self) -> &'static str {
        match self {
            Request::Hello => "hello",
            Request::Register { .. } => "register",
            Request::Login { .. } => "login",
            Request::GetUser { .. } => "get_user",
            Request::ListUsers { .. } => "list_users",
            Request::SetRole { .. } => "set_role",
            Request::CreateItem { .. } => "create_item",
            Request::UpdateItem { .. } => "update_item",
            Request::DeleteItem { .. } => "delete_item",
            Request::GetItem { .. } => "get_item",
            Request::ListItems { .. } => "list_items",
            Request::CreateCategory { .. } => "create_category",
            Request::UpdateCategory { .. } => "update_category",
            Request::DeleteCategory { .. } => "delete_category",
            Request::ListCategories { .. } => "list_categories",
            Request::CategoryItems { .. } => "category_items",
            Request::CreateTag { .. } => "create_tag",
            Request::DeleteTag { .. } => "delete_tag",
            Request::ListTags { .. } => "list_tags",
            Request::TagItems { .. } => "tag_items",
            Request::Search { .. } => "search",
            Request::Analytics => "analytics",
            Request::RefreshAnalytics => "refresh_analytics",
            Request::AuditLogs { .. } => "audit_logs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_register() {
        let request = Request::parse(
            r#"{"op":"register","username":"alice","password":"password123","email":"a@example.com"}"#,
        )
        .unwrap();
        assert_eq!(request.op(), "register");
        assert!(matches!(request, Request::Register { ref username, .. } if username == "alice"));
    }

    #[test]
    fn test_parse_list_with_paging_and_filter() {
        let request = Request::parse(
            r#"{"op":"list_items","actor_id":"u1","page":2,"per_page":10,
                "sort_by":"price","sort_desc":true,"filter":{"category_id":"c1"}}"#,
        )
        .unwrap();

        match request {
            Request::ListItems { actor_id, page } => {
                assert_eq!(actor_id, "u1");
                assert_eq!(page.page, 2);
                assert_eq!(page.per_page, 10);
                assert_eq!(page.sort_by.as_deref(), Some("price"));
                assert!(page.sort_desc);
                assert_eq!(page.filter.get("category_id").map(String::as_str), Some("c1"));
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_without_paging_uses_defaults() {
        let request = Request::parse(r#"{"op":"list_tags","actor_id":"u1"}"#).unwrap();
        match request {
            Request::ListTags { page, .. } => assert_eq!(page, PageRequest::default()),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_parse_create_item() {
        let request = Request::parse(
            r#"{"op":"create_item","actor_id":"u1","name":"Lamp","price":19.5,"tags":["t1"]}"#,
        )
        .unwrap();
        match request {
            Request::CreateItem { item, .. } => {
                assert_eq!(item.name, "Lamp");
                assert_eq!(item.price, 19.5);
                assert_eq!(item.tags, vec!["t1".to_string()]);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_aliases() {
        let request = Request::parse(r#"{"op":"search","q":"dmin","type":"users"}"#).unwrap();
        assert_eq!(
            request,
            Request::Search {
                query: "dmin".to_string(),
                scope: SearchScope::Users
            }
        );
    }

    #[test]
    fn test_unknown_and_malformed() {
        assert_eq!(
            Request::parse(r#"{"op":"drop_table"}"#).unwrap_err().code(),
            "UNKNOWN_OPERATION"
        );
        assert_eq!(
            Request::parse(r#"{"username":"x"}"#).unwrap_err().code(),
            "INVALID_REQUEST"
        );
        assert_eq!(
            Request::parse(r#"{"op":"get_item","actor_id":"u1"}"#).unwrap_err().code(),
            "INVALID_REQUEST"
        );
        assert_eq!(Request::parse("not json").unwrap_err().code(), "INVALID_REQUEST");
    }

    #[test]
    fn test_every_operation_has_a_variant() {
        assert!(OPERATIONS.contains(&Request::Hello.op()));
        assert!(OPERATIONS.contains(&Request::RefreshAnalytics.op()));
        assert_eq!(OPERATIONS.len(), 24);
    }
}
