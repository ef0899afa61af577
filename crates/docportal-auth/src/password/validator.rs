//! Password policy enforcement for new passwords.

use docportal_core::config::AuthConfig;
use docportal_core::error::AppError;

/// Longest accepted password, in bytes.
const MAX_LENGTH: usize = 255;

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length, in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password and its confirmation.
    pub fn validate(&self, password: &str, confirmation: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "The password must be at least {} characters.",
                self.min_length
            )));
        }
        if password.len() > MAX_LENGTH {
            return Err(AppError::validation(format!(
                "The password must not be greater than {MAX_LENGTH} characters."
            )));
        }
        if password != confirmation {
            return Err(AppError::validation(
                "The password field confirmation does not match.",
            ));
        }
        Ok(())
    }
}
