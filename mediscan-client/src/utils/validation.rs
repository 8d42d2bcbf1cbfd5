//! Format checks the `validator` derives do not cover.

use mediscan_core::AppError;

pub fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(message.to_string()));
    }
    Ok(())
}

/// National ID: exactly eight digits.
pub fn check_dni(dni: &str) -> Result<(), AppError> {
    if dni.len() == 8 && dni.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::ValidationError(
            "DNI must have exactly 8 digits".to_string(),
        ))
    }
}

/// Registration phone: optional leading `+`, then at least eight digits,
/// spaces or dashes.
pub fn check_register_phone(phone: &str) -> Result<(), AppError> {
    let body = phone.strip_prefix('+').unwrap_or(phone);
    let valid = body.chars().count() >= 8
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(AppError::ValidationError(
            "Enter a valid phone number".to_string(),
        ))
    }
}

/// Profile edits are looser than registration and also accept parentheses.
pub fn check_profile_phone(phone: &str) -> Result<(), AppError> {
    let body = phone.strip_prefix('+').unwrap_or(phone);
    let valid = !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));

    if valid {
        Ok(())
    } else {
        Err(AppError::ValidationError(
            "Enter a valid phone number".to_string(),
        ))
    }
}
