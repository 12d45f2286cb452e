// src/utils/validate.rs

//! Field validators shared by account-facing commands.

use crate::error::{AppError, Result};

/// A contact phone number must be exactly 10 digits.
pub fn validate_phone(phone: &str) -> Result<()> {
    if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::validation(
            "phone number must contain exactly 10 digits",
        ))
    }
}

/// A password must be at least 8 characters long.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() >= 8 {
        Ok(())
    } else {
        Err(AppError::validation(
            "password must be at least 8 characters",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("5512345678").is_ok());
        assert!(validate_phone("55123456").is_err());
        assert!(validate_phone("55123456789").is_err());
        assert!(validate_phone("55-1234-567").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secreto1").is_ok());
        assert!(validate_password("corto").is_err());
    }
}
