//! Local input checks run before any request is sent.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppError;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").expect("valid email pattern")
});

/// Syntactic email check. Not RFC 5322: it accepts what the backend's own
/// forms accept.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Both login fields present and the email well-formed.
pub fn check_login(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::validation("Please fill in both fields"));
    }
    if !is_valid_email(email.trim()) {
        return Err(AppError::validation("Please enter a valid email"));
    }
    Ok(())
}

/// New password entered twice identically, and not blank.
pub fn check_password_change(new_password: &str, confirm_password: &str) -> Result<(), AppError> {
    if new_password.is_empty() {
        return Err(AppError::validation("Please enter a new password."));
    }
    if new_password != confirm_password {
        return Err(AppError::validation("Passwords do not match."));
    }
    Ok(())
}
