//! Observability for catalogdb
//!
//! - Structured logging (one JSON object per line)
//! - Typed lifecycle events
//! - Timed operation scopes
//! - The audit recorder, which turns catalog actions into stored
//!   audit log entries on a background worker
//!
//! # Usage
//!
//! ```ignore
//! use catalogdb::observability::{Logger, Event, ObservationScope};
//!
//! Logger::info("QUERY_COMPLETE", &[("rows", "42")]);
//!
//! let scope = ObservationScope::new("ANALYTICS_REFRESH");
//! // ... do work ...
//! scope.complete();
//! ```

mod audit;
mod events;
mod logger;
mod scope;

pub use audit::{AuditRecorder, AuditStats};
pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

fn event_severity(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event_severity(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}
