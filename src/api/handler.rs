//! API Handler for catalogdb
//!
//! Parses one request, resolves the actor if the operation needs one, calls
//! the catalog service and renders the result. Concurrency is the store's
//! business; the handler holds no lock of its own.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::observability::{log_event_with_fields, Event};
use crate::service::{Actor, CatalogService};

use super::errors::{ApiError, ApiResult};
use super::request::Request;
use super::response::Response;

/// Version reported by `hello`
pub const API_VERSION: &str = "1.0.0";

/// Dispatches JSON requests to the catalog service
pub struct ApiHandler {
    service: Arc<CatalogService>,
    app_name: String,
}

fn to_data<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(ApiError::serialization)
}

impl ApiHandler {
    pub fn new(service: Arc<CatalogService>, app_name: impl Into<String>) -> Self {
        Self {
            service,
            app_name: app_name.into(),
        }
    }

    /// The service requests are dispatched to
    pub fn service(&self) -> &Arc<CatalogService> {
        &self.service
    }

    /// Handle a raw JSON request string
    pub fn handle(&self, json_request: &str) -> Response {
        let request = match Request::parse(json_request) {
            Ok(r) => r,
            Err(e) => return self.reject("unparsed", e),
        };

        let op = request.op();
        match self.dispatch(request) {
            Ok(data) => Response::success(data),
            Err(e) => self.reject(op, e),
        }
    }

    fn reject(&self, op: &str, err: ApiError) -> Response {
        if err.is_client_error() {
            log_event_with_fields(
                Event::RequestRejected,
                &[("code", err.code()), ("op", op)],
            );
        }
        Response::error(&err)
    }

    fn actor(&self, actor_id: &str) -> ApiResult<Actor> {
        Ok(self.service.resolve_actor(actor_id)?)
    }

    /// Execute a parsed request
    pub fn dispatch(&self, request: Request) -> ApiResult<Value> {
        let service = &self.service;

        match request {
            Request::Hello => Ok(json!({
                "name": self.app_name,
                "version": API_VERSION,
            })),

            Request::Register {
                username,
                password,
                email,
            } => {
                let user = service.register(&username, &password, &email)?;
                Ok(json!({ "user_id": user.id }))
            }
            Request::Login { username, password } => {
                let user = service.authenticate(&username, &password)?;
                Ok(json!({
                    "user_id": user.id,
                    "username": user.username,
                    "role": user.role,
                }))
            }
            Request::GetUser { actor_id, id } => {
                self.actor(&actor_id)?;
                to_data(service.get_user(&id)?)
            }
            Request::ListUsers { actor_id, page } => {
                self.actor(&actor_id)?;
                to_data(service.list_users(&page)?)
            }
            Request::SetRole {
                actor_id,
                user_id,
                role,
            } => {
                let actor = self.actor(&actor_id)?;
                to_data(service.set_user_role(&actor, &user_id, role)?)
            }

            Request::CreateItem { actor_id, item } => {
                let actor = self.actor(&actor_id)?;
                to_data(service.create_item(&actor, item)?)
            }
            Request::UpdateItem { actor_id, id, item } => {
                let actor = self.actor(&actor_id)?;
                to_data(service.update_item(&actor, &id, item)?)
            }
            Request::DeleteItem { actor_id, id } => {
                let actor = self.actor(&actor_id)?;
                service.delete_item(&actor, &id)?;
                Ok(json!({ "deleted": id }))
            }
            Request::GetItem { actor_id, id } => {
                self.actor(&actor_id)?;
                to_data(service.get_item(&id)?)
            }
            Request::ListItems { actor_id, page } => {
                self.actor(&actor_id)?;
                to_data(service.list_items(&page)?)
            }

            Request::CreateCategory {
                actor_id,
                name,
                description,
            } => {
                let actor = self.actor(&actor_id)?;
                to_data(service.create_category(&actor, &name, &description)?)
            }
            Request::UpdateCategory {
                actor_id,
                id,
                name,
                description,
            } => {
                let actor = self.actor(&actor_id)?;
                to_data(service.update_category(&actor, &id, &name, &description)?)
            }
            Request::DeleteCategory { actor_id, id } => {
                let actor = self.actor(&actor_id)?;
                service.delete_category(&actor, &id)?;
                Ok(json!({ "deleted": id }))
            }
            Request::ListCategories { actor_id, page } => {
                self.actor(&actor_id)?;
                to_data(service.list_categories(&page)?)
            }
            Request::CategoryItems { actor_id, id } => {
                self.actor(&actor_id)?;
                to_data(service.items_by_category(&id)?)
            }

            Request::CreateTag { actor_id, name } => {
                let actor = self.actor(&actor_id)?;
                to_data(service.create_tag(&actor, &name)?)
            }
            Request::DeleteTag { actor_id, id } => {
                let actor = self.actor(&actor_id)?;
                service.delete_tag(&actor, &id)?;
                Ok(json!({ "deleted": id }))
            }
            Request::ListTags { actor_id, page } => {
                self.actor(&actor_id)?;
                to_data(service.list_tags(&page)?)
            }
            Request::TagItems { actor_id, id } => {
                self.actor(&actor_id)?;
                to_data(service.items_by_tag(&id)?)
            }

            Request::Search { query, scope } => to_data(service.search(&query, scope)?),
            Request::Analytics => to_data(service.analytics()?),
            Request::RefreshAnalytics => to_data(service.refresh_analytics()?),
            Request::AuditLogs { limit } => to_data(service.audit_logs(limit)?),
        }
    }
}
