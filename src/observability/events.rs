//! Lifecycle events for the catalog store
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Configuration file absent, defaults in use
    ConfigDefaulted,
    /// Record store opened and ready
    StoreOpened,
    /// JSON-lines request loop ready
    Serving,
    /// Shutdown complete
    ShutdownComplete,

    // Snapshot file
    /// No snapshot existed, an empty one was written
    SnapshotCreated,
    /// Snapshot could not be parsed (FATAL under the fail policy)
    SnapshotCorrupt,
    /// Corrupt snapshot backed up and store reset to empty
    SnapshotReset,
    /// Snapshot write failed after an in-memory mutation
    SnapshotSaveFailed,

    // Analytics
    /// Analytics snapshot recomputed
    AnalyticsRefreshed,

    // Audit
    /// Audit worker started
    AuditWorkerStarted,
    /// Audit entry could not be recorded and was dropped
    AuditDropped,
    /// Audit worker drained and stopped
    AuditWorkerStopped,

    // Accounts
    /// Default admin account seeded
    AdminSeeded,

    // Requests
    /// Request rejected by validation or policy
    RequestRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "CATALOGDB_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigDefaulted => "CONFIG_DEFAULTED",
            Event::StoreOpened => "STORE_OPENED",
            Event::Serving => "CATALOGDB_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::SnapshotCreated => "SNAPSHOT_CREATED",
            Event::SnapshotCorrupt => "SNAPSHOT_CORRUPT",
            Event::SnapshotReset => "SNAPSHOT_RESET",
            Event::SnapshotSaveFailed => "SNAPSHOT_SAVE_FAILED",

            Event::AnalyticsRefreshed => "ANALYTICS_REFRESHED",

            Event::AuditWorkerStarted => "AUDIT_WORKER_STARTED",
            Event::AuditDropped => "AUDIT_DROPPED",
            Event::AuditWorkerStopped => "AUDIT_WORKER_STOPPED",

            Event::AdminSeeded => "ADMIN_SEEDED",

            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::SnapshotCorrupt)
    }

    /// Returns true if this event signals degraded but continuing operation
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::ConfigDefaulted
                | Event::SnapshotReset
                | Event::SnapshotSaveFailed
                | Event::AuditDropped
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::BootStart,
            Event::ConfigLoaded,
            Event::ConfigDefaulted,
            Event::StoreOpened,
            Event::Serving,
            Event::ShutdownComplete,
            Event::SnapshotCreated,
            Event::SnapshotCorrupt,
            Event::SnapshotReset,
            Event::SnapshotSaveFailed,
            Event::AnalyticsRefreshed,
            Event::AuditWorkerStarted,
            Event::AuditDropped,
            Event::AuditWorkerStopped,
            Event::AdminSeeded,
            Event::RequestRejected,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::SnapshotCorrupt.is_fatal());
        assert!(!Event::SnapshotReset.is_fatal());
        assert!(!Event::StoreOpened.is_fatal());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::StoreOpened), "STORE_OPENED");
        assert_eq!(format!("{}", Event::AuditDropped), "AUDIT_DROPPED");
    }
}
