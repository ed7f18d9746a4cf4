//! Input validation shared by the add and edit paths
//!
//! Rules, checked in order (first failure wins):
//! 1. name must be non-empty after trimming
//! 2. phone must contain at least [`MIN_PHONE_DIGITS`] digits once every
//!    non-digit character is stripped

use crate::error::ValidationError;

/// Minimum number of digit characters in a phone number
pub const MIN_PHONE_DIGITS: usize = 3;

/// A name/phone pair that passed validation, ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    /// Trimmed name
    pub name: String,
    /// Trimmed phone, otherwise as entered
    pub phone: String,
}

/// Validate raw form input
pub fn validate(name_raw: &str, phone_raw: &str) -> Result<ContactDraft, ValidationError> {
    let name = name_raw.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }

    let phone = phone_raw.trim();
    if digit_count(phone) < MIN_PHONE_DIGITS {
        return Err(ValidationError::PhoneTooShort);
    }

    Ok(ContactDraft {
        name: name.to_string(),
        phone: phone.to_string(),
    })
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}
