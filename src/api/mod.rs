//! API Layer for catalogdb
//!
//! A JSON request/response envelope over the catalog service, used by the
//! `start` command's stdin loop.
//!
//! # Design Principles
//!
//! - One request object in, one response object out
//! - Error codes passed through unchanged from the service and store
//! - Identity arrives as an already-issued user id (`actor_id`)

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult, Severity};
pub use handler::{ApiHandler, API_VERSION};
pub use request::{Request, OPERATIONS};
pub use response::Response;
