//! API error types
//!
//! API errors are pass-through: they keep the code of the service or store
//! error that caused them.

use std::fmt;

use crate::service::ServiceError;

/// API error severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable error
    Error,
    /// System must halt
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

/// API-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Request is not valid JSON or misses a field
    InvalidRequest,
    /// `op` names no known operation
    UnknownOperation,
    /// Result could not be rendered as JSON
    SerializationFailed,
}

impl ApiErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::InvalidRequest => "INVALID_REQUEST",
            ApiErrorCode::UnknownOperation => "UNKNOWN_OPERATION",
            ApiErrorCode::SerializationFailed => "SERIALIZATION_FAILED",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// API error with preserved service error information
#[derive(Debug)]
pub struct ApiError {
    /// Original error code string (from service, store or API)
    code: String,
    message: String,
    /// HTTP-equivalent status
    status: u16,
    severity: Severity,
}

impl ApiError {
    fn new(code: ApiErrorCode, message: impl Into<String>, status: u16) -> Self {
        Self {
            code: code.code().to_string(),
            message: message.into(),
            status,
            severity: Severity::Error,
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidRequest, reason, 400)
    }

    /// Create an unknown operation error
    pub fn unknown_operation(op: &str) -> Self {
        Self::new(
            ApiErrorCode::UnknownOperation,
            format!("Unknown operation: {}", op),
            400,
        )
    }

    /// Create a serialization error
    pub fn serialization(err: serde_json::Error) -> Self {
        Self::new(
            ApiErrorCode::SerializationFailed,
            format!("Failed to serialize result: {}", err),
            500,
        )
    }

    /// Create from a service error (pass-through)
    pub fn from_service_error(err: ServiceError) -> Self {
        let severity = match &err {
            ServiceError::Store(store_err) if store_err.is_fatal() => Severity::Fatal,
            _ => Severity::Error,
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            status: err.status_code(),
            severity,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP-equivalent status
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the severity
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        matches!(self.severity, Severity::Fatal)
    }

    /// Whether the request, not the system, is at fault
    pub fn is_client_error(&self) -> bool {
        self.status < 500
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::from_service_error(err)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
