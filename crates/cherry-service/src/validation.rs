//! Field checks shared by the account services.

use validator::ValidateEmail;

use cherry_core::error::AppError;
use cherry_core::result::AppResult;
use cherry_entity::user::normalize_email;

/// Return the value of a required field, rejecting absent or blank input.
pub fn required<'a>(value: Option<&'a str>, message: &str) -> AppResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::validation(message))
}

/// Trimmed display name; blank names are rejected.
pub fn display_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    Ok(name.to_string())
}

/// Normalized (trimmed, lowercased) email address, rejected when malformed.
pub fn email_address(email: &str) -> AppResult<String> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }
    if !email.validate_email() {
        return Err(AppError::validation("Please provide a valid email"));
    }
    Ok(email)
}
