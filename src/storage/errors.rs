//! Record store error types
//!
//! Error codes:
//! - CATALOG_NOT_FOUND (ERROR severity)
//! - CATALOG_PERSISTENCE_FAILED (ERROR severity)
//! - CATALOG_SNAPSHOT_CORRUPT (FATAL severity)
//! - CATALOG_LOCK_POISONED (FATAL severity)

use std::fmt;
use std::io;

use crate::model::EntityKind;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, process continues
    Error,
    /// Store cannot be trusted; process must stop
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Store error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Id or field value absent from the collection
    CatalogNotFound,
    /// Snapshot serialization or file I/O failed
    CatalogPersistenceFailed,
    /// Snapshot file exists but cannot be parsed
    CatalogSnapshotCorrupt,
    /// A thread panicked while holding the store lock
    CatalogLockPoisoned,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::CatalogNotFound => "CATALOG_NOT_FOUND",
            StoreErrorCode::CatalogPersistenceFailed => "CATALOG_PERSISTENCE_FAILED",
            StoreErrorCode::CatalogSnapshotCorrupt => "CATALOG_SNAPSHOT_CORRUPT",
            StoreErrorCode::CatalogLockPoisoned => "CATALOG_LOCK_POISONED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::CatalogNotFound => Severity::Error,
            StoreErrorCode::CatalogPersistenceFailed => Severity::Error,
            StoreErrorCode::CatalogSnapshotCorrupt => Severity::Fatal,
            StoreErrorCode::CatalogLockPoisoned => Severity::Fatal,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with context
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StoreError {
    /// No record with `id` in the collection of `kind`
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        Self {
            code: StoreErrorCode::CatalogNotFound,
            message: format!("{} not found", kind),
            details: Some(format!("{}: {}", kind.collection(), id)),
            source: None,
        }
    }

    /// No record of `kind` whose `field` equals `value`
    pub fn not_found_by_field(kind: EntityKind, field: &str, value: &str) -> Self {
        Self {
            code: StoreErrorCode::CatalogNotFound,
            message: format!("{} not found", kind),
            details: Some(format!("{}.{} = {}", kind.collection(), field, value)),
            source: None,
        }
    }

    /// Snapshot could not be written or read
    pub fn persistence_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::CatalogPersistenceFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Snapshot exists but does not parse
    pub fn snapshot_corrupt(location: &str, reason: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::CatalogSnapshotCorrupt,
            message: reason.into(),
            details: Some(format!("snapshot: {}", location)),
            source: None,
        }
    }

    /// The store lock was poisoned by a panicking thread
    pub fn lock_poisoned() -> Self {
        Self {
            code: StoreErrorCode::CatalogLockPoisoned,
            message: "store lock poisoned".to_string(),
            details: None,
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns whether this is a not-found error
    pub fn is_not_found(&self) -> bool {
        self.code == StoreErrorCode::CatalogNotFound
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
