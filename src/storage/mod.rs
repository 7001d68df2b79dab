//! Storage subsystem
//!
//! The record store keeps every collection in memory behind one lock and
//! mirrors the whole state to a snapshot after each mutation.
//!
//! # Persisted layout
//!
//! ```text
//! {
//!   "users":      { "<id>": { ... } },
//!   "items":      { "<id>": { ... } },
//!   "categories": { "<id>": { ... } },
//!   "tags":       { "<id>": { ... } },
//!   "audit_logs": { "<id>": { ... } },
//!   "analytics":  { ... }
//! }
//! ```
//!
//! Pretty-printed JSON, rewritten in full on every mutation.

mod errors;
mod record;
mod snapshot;
mod state;
mod store;

pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use record::Record;
pub use snapshot::{CorruptSnapshotPolicy, JsonSnapshotFile, MemorySnapshot, SnapshotStore};
pub use state::StoreState;
pub use store::RecordStore;
