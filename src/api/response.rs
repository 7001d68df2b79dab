//! Response lines written by `catalogdb start`
//!
//! Each request line on stdin gets exactly one line on stdout. A handled
//! operation answers with its result under `data`; a refused one answers with
//! the code of the service or store error that refused it, so a client sees
//! `CONFLICT` for a taken username and `NOT_FOUND` for a missing item rather
//! than a generic failure.
//!
//! ```text
//! {"status":"ok","data":{"id":"...","name":"Lamp","price":19.5,...}}
//! {"status":"error","code":"CONFLICT","message":"Conflict: Username already taken"}
//! ```

use serde::Deserialize;
use serde_json::{json, Value};

use super::errors::ApiError;

/// Outcome of one request line
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    /// The operation ran; `data` holds its result
    Ok { data: Value },
    /// The operation was refused
    Error { code: String, message: String },
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Ok { data }
    }

    /// Carries the error's own code through unchanged
    pub fn error(err: &ApiError) -> Self {
        Response::Error {
            code: err.code().to_string(),
            message: err.message().to_string(),
        }
    }

    /// The response as a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            Response::Ok { data } => json!({ "status": "ok", "data": data }),
            Response::Error { code, message } => json!({
                "status": "error",
                "code": code,
                "message": message,
            }),
        }
    }

    /// The response as one line of JSON, without the trailing newline
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }

    /// The payload of a handled operation
    pub fn data(&self) -> Option<&Value> {
        match self {
            Response::Ok { data } => Some(data),
            Response::Error { .. } => None,
        }
    }

    /// The code of a refused operation
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Response::Ok { .. } => None,
            Response::Error { code, .. } => Some(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User};
    use crate::service::ServiceError;

    #[test]
    fn test_taken_username_answers_conflict() {
        let err = ApiError::from(ServiceError::Conflict("Username already taken".into()));
        let response = Response::error(&err);

        assert!(!response.is_success());
        assert_eq!(response.error_code(), Some("CONFLICT"));
        assert_eq!(
            response.to_value(),
            json!({
                "status": "error",
                "code": "CONFLICT",
                "message": "Conflict: Username already taken",
            })
        );
    }

    #[test]
    fn test_registered_user_is_written_on_one_line() {
        let user = User::new("alice", "digest", "alice@example.com", Role::User).redacted();
        let response = Response::success(serde_json::to_value(&user).unwrap());

        let line = response.to_json();
        assert!(!line.contains('\n'));

        let parsed: Response = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, response);
        assert_eq!(parsed.data().unwrap()["username"], "alice");
        assert_eq!(parsed.data().unwrap()["password"], "");
        assert!(parsed.error_code().is_none());
    }

    #[test]
    fn test_malformed_request_line_is_refused() {
        let response = Response::error(&ApiError::invalid_request("expected value at line 1"));
        let parsed: Response = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(parsed.error_code(), Some("INVALID_REQUEST"));
        assert!(parsed.data().is_none());
    }
}
