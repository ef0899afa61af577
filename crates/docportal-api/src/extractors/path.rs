//! Typed path parameter helpers.

use uuid::Uuid;

use docportal_core::error::AppError;
use docportal_entity::file::EntryType;
use docportal_entity::menu::MenuSlug;

/// Parses a UUID from a path segment.
pub fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s).map_err(|_| AppError::validation(format!("Invalid UUID: {s}")))
}

/// Parses a menu slug. Unknown slugs are not found.
pub fn parse_menu(s: &str) -> Result<MenuSlug, AppError> {
    s.parse()
}

/// Parses `file` or `folder`.
pub fn parse_entry_type(s: &str) -> Result<EntryType, AppError> {
    s.parse()
}
