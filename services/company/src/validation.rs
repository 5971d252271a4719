//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Longest accepted password; argon2 input beyond this is pointless work
pub const MAX_PASSWORD_LEN: usize = 128;

/// Longest accepted name, mission or location
pub const MAX_PROFILE_FIELD_LEN: usize = 1024;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
///
/// Only presence and length are checked; strength policy is left to clients.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(format!(
            "Password must be at most {} characters long",
            MAX_PASSWORD_LEN
        ));
    }

    Ok(())
}

/// Validate a free-text profile field such as name, mission or location
pub fn validate_profile_field(field: &str, value: &str) -> Result<(), String> {
    if value.chars().count() > MAX_PROFILE_FIELD_LEN {
        return Err(format!(
            "{} must be at most {} characters long",
            field, MAX_PROFILE_FIELD_LEN
        ));
    }

    Ok(())
}
