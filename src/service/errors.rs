//! # Service Errors
//!
//! Error types for the catalog service.

use thiserror::Error;

use crate::storage::StoreError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Catalog service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    // ==================
    // Caller Errors
    // ==================
    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input failed validation
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Unique value already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    // ==================
    // Identity Errors
    // ==================
    /// Unknown user or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Actor lacks permission for the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Feature switched off in configuration
    #[error("Feature disabled: {0}")]
    Disabled(&'static str),

    // ==================
    // Internal Errors
    // ==================
    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Store operation failed
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl ServiceError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::InvalidCredentials => "INVALID_CREDENTIALS",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::Disabled(_) => "FEATURE_DISABLED",
            ServiceError::HashingFailed => "INTERNAL_ERROR",
            ServiceError::Store(err) => err.code().code(),
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            ServiceError::Validation(_) => 400,

            // 401 Unauthorized
            ServiceError::InvalidCredentials => 401,

            // 403 Forbidden
            ServiceError::Forbidden(_) => 403,

            // 404 Not Found
            ServiceError::NotFound(_) => 404,

            // 409 Conflict
            ServiceError::Conflict(_) => 409,

            // 503 Service Unavailable
            ServiceError::Disabled(_) => 503,

            // 500 Internal Server Error
            ServiceError::HashingFailed => 500,
            ServiceError::Store(_) => 500,
        }
    }

    /// Whether the caller, not the system, is at fault
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            let what = match err.details() {
                Some(details) => format!("{} ({})", err.message(), details),
                None => err.message().to_string(),
            };
            ServiceError::NotFound(what)
        } else {
            ServiceError::Store(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;
    use std::io;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(ServiceError::InvalidCredentials.status_code(), 401);
        assert_eq!(ServiceError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(ServiceError::Conflict("x".into()).status_code(), 409);
        assert_eq!(ServiceError::HashingFailed.status_code(), 500);
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: ServiceError = StoreError::not_found(EntityKind::Tag, "t1").into();
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.to_string().contains("tags: t1"));
    }

    #[test]
    fn test_store_failure_keeps_store_code() {
        let err: ServiceError = StoreError::persistence_failed(
            "failed to write snapshot",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        )
        .into();
        assert_eq!(err.code(), "CATALOG_PERSISTENCE_FAILED");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_invalid_credentials_does_not_leak() {
        let err = ServiceError::InvalidCredentials;
        assert!(!err.to_string().contains("password"));
        assert!(!err.to_string().contains("username"));
    }
}
