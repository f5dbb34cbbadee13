//! Pure field validators for registration input.
//!
//! One validator per field, shared by the public form and the admin
//! manual-entry path so the rules cannot drift between entry points.
//! No normalization is applied beyond trimming and the phone character strip.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;
use crate::models::RegisterRequest;

/// Maximum accepted length for a full name, in characters.
pub const MAX_NAME_CHARS: usize = 200;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

static NATIONAL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{7,8}$").expect("national id regex"));

/// Registration input that has passed all field validators.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
}

/// Validate a full registration request. The first failing field
/// short-circuits with its specific error.
pub fn validate_registration(request: &RegisterRequest) -> Result<ValidRegistration, AppError> {
    Ok(ValidRegistration {
        full_name: validate_full_name(&request.full_name)?,
        email: validate_email(&request.email)?,
        phone: validate_phone(&request.phone)?,
        national_id: validate_national_id(&request.national_id)?,
    })
}

/// Non-empty after trimming, at most [`MAX_NAME_CHARS`] characters.
pub fn validate_full_name(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Full name is a required field.".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::Validation("Full name is too long.".to_string()));
    }
    Ok(trimmed.to_string())
}

/// RFC-plausible email syntax check.
pub fn validate_email(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !EMAIL_RE.is_match(trimmed) {
        return Err(AppError::Validation(
            "Please enter a valid email address.".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Strip everything except digits and a leading `+`, then require at least
/// 10 remaining characters. The stripped form is what gets stored.
pub fn validate_phone(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let mut stripped = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        if c.is_ascii_digit() || (c == '+' && i == 0) {
            stripped.push(c);
        }
    }
    if stripped.len() < 10 {
        return Err(AppError::Validation(
            "Please enter a valid phone number.".to_string(),
        ));
    }
    Ok(stripped)
}

/// Exactly 7 or 8 decimal digits, anchored at both ends.
pub fn validate_national_id(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if !NATIONAL_ID_RE.is_match(trimmed) {
        return Err(AppError::Validation(
            "Please enter a valid national ID (7 or 8 digits).".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
