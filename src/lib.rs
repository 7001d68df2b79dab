//! catalogdb - an embedded, snapshot-backed catalog record store
//!
//! Users, items, categories, tags and audit logs live in one in-memory
//! state guarded by a reader-writer lock and written to a JSON snapshot
//! after every mutation.

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod model;
pub mod observability;
pub mod query;
pub mod service;
pub mod storage;
