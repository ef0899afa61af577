//! Field rules shared by registration and admin user management.

use validator::ValidateEmail;

use docportal_core::error::AppError;

/// Longest accepted name or email, in characters.
const MAX_FIELD_LENGTH: usize = 255;

/// Trim a display name and check its length.
pub fn normalize_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("The name field is required."));
    }
    if name.chars().count() > MAX_FIELD_LENGTH {
        return Err(AppError::validation(
            "The name field must not be greater than 255 characters.",
        ));
    }
    Ok(name.to_string())
}

/// Trim and lowercase an email address and check its shape.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::validation("The email field is required."));
    }
    if email.chars().count() > MAX_FIELD_LENGTH {
        return Err(AppError::validation(
            "The email field must not be greater than 255 characters.",
        ));
    }
    if !email.validate_email() {
        return Err(AppError::validation(
            "The email field must be a valid email address.",
        ));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert_eq!(normalize_name("  Ada Lovelace ").unwrap(), "Ada Lovelace");
        assert!(normalize_name("  ").is_err());
        assert!(normalize_name(&"n".repeat(256)).is_err());
    }

    #[test]
    fn test_email_is_normalized() {
        assert_eq!(
            normalize_email(" Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("").is_err());
        assert!(normalize_email("a@").is_err());
    }
}
