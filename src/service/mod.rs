//! Catalog service layer
//!
//! Validation, uniqueness, credentials, permissions and auditing on top of
//! the record store, which itself trusts its input.

mod actor;
mod catalog;
mod credentials;
mod errors;
mod validation;

pub use actor::Actor;
pub use catalog::{CatalogService, ItemDraft, SearchResults, SearchScope, DEFAULT_AUDIT_LIMIT};
pub use credentials::{hash_password, verify_password};
pub use errors::{ServiceError, ServiceResult};
pub use validation::{
    is_valid_email, is_valid_password, is_valid_username, validate_item, validate_name,
    validate_registration, MIN_PASSWORD_LENGTH,
};
