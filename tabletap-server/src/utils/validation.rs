//! Input validation helpers
//!
//! Small checks shared by the auth, staff and menu handlers. Each returns a
//! validation [`AppError`] with a message the client can show directly.

use shared::{AppError, AppResult};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Normalize an email for storage and lookup (trim + lowercase)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an email address. Expects the normalized form.
pub fn validate_email(email: &str) -> AppResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(())
}

/// Validate a password against the minimum length policy
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "Password must be at least 8 characters long",
        ));
    }
    Ok(())
}

/// Validate a required display name (non-empty after trimming)
pub fn validate_name(name: &str, field: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Largest quantity a single order line may carry
pub const MAX_ITEM_QUANTITY: u32 = 100;

/// Validate an order line quantity
pub fn validate_quantity(quantity: u32) -> AppResult<()> {
    if quantity == 0 || quantity > MAX_ITEM_QUANTITY {
        return Err(AppError::validation(
            "Item quantity must be between 1 and 100",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Owner@Example.COM "), "owner@example.com");
    }

    #[test]
    fn accepts_plain_email() {
        assert!(validate_email("owner@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["", "no-at-sign", "@example.com", "a@b", "a b@example.com"] {
            assert!(validate_email(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn rejects_short_password() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        assert!(validate_name("   ", "Name").is_err());
        assert!(validate_name("Kitchen A", "Name").is_ok());
    }

    #[test]
    fn rejects_out_of_range_quantity() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(101).is_err());
    }
}
