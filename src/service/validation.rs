//! Input validation for account and catalog data

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{ServiceError, ServiceResult};

/// Minimum password length, in bytes
pub const MIN_PASSWORD_LENGTH: usize = 8;

const USERNAME_PATTERN: &str = r"^[a-zA-Z0-9_]{3,20}$";
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$";

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(value))
}

/// 3 to 20 ASCII letters, digits or underscores
pub fn is_valid_username(username: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&RE, USERNAME_PATTERN, username)
}

pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&RE, EMAIL_PATTERN, email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
}

/// Checks a registration request, reporting the first problem found
pub fn validate_registration(username: &str, password: &str, email: &str) -> ServiceResult<()> {
    if !is_valid_username(username) {
        return Err(ServiceError::Validation("Invalid username format".to_string()));
    }
    if !is_valid_email(email) {
        return Err(ServiceError::Validation("Invalid email format".to_string()));
    }
    if !is_valid_password(password) {
        return Err(ServiceError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Item names must be non-empty; prices finite and non-negative
pub fn validate_item(name: &str, price: f64) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("Item name is required".to_string()));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(ServiceError::Validation(
            "Item price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

/// Category and tag names must be non-empty
pub fn validate_name(kind: &str, name: &str) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{} name is required", kind)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usernames() {
        assert!(is_valid_username("alice_01"));
        assert!(is_valid_username("abc"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("a".repeat(21).as_str()));
        assert!(!is_valid_username("bad name"));
        assert!(!is_valid_username("dash-ed"));
    }

    #[test]
    fn test_emails() {
        assert!(is_valid_email("a.b+c@example.co"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("x@example.c"));
    }

    #[test]
    fn test_registration_reports_first_problem() {
        let err = validate_registration("ab", "short", "bad").unwrap_err();
        assert!(err.to_string().contains("username"));

        let err = validate_registration("alice", "short", "a@example.com").unwrap_err();
        assert!(err.to_string().contains("at least 8"));

        assert!(validate_registration("alice", "longenough", "a@example.com").is_ok());
    }

    #[test]
    fn test_items() {
        assert!(validate_item("Lamp", 0.0).is_ok());
        assert!(validate_item("  ", 1.0).is_err());
        assert!(validate_item("Lamp", -0.5).is_err());
        assert!(validate_item("Lamp", f64::NAN).is_err());
        assert!(validate_item("Lamp", f64::INFINITY).is_err());
    }
}
