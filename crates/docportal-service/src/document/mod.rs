//! Document listing and mutation under a menu.

pub mod listing;
pub mod mutation;

pub use listing::{DocumentEntry, DocumentListing, DocumentListingService, ListingQuery};
pub use mutation::{
    DeleteSummary, DocumentMutationService, DownloadResult, RenamedEntry, UploadedFile,
};

use docportal_core::error::AppError;
use docportal_database::repositories::MenuRepository;
use docportal_entity::menu::{Menu, MenuSlug};

/// Longest accepted folder or file name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Trim a folder or file name and check its length.
pub fn normalize_entry_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("The name field is required."));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "The name must not be greater than {MAX_NAME_LENGTH} characters."
        )));
    }
    Ok(trimmed.to_string())
}

/// Load the menu row for a slug.
pub(crate) async fn resolve_menu(repo: &MenuRepository, slug: MenuSlug) -> Result<Menu, AppError> {
    repo.find_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu '{slug}' not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(normalize_entry_name("  Reports 2024 ").unwrap(), "Reports 2024");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(normalize_entry_name("   ").is_err());
        assert!(normalize_entry_name("").is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(normalize_entry_name(&"é".repeat(255)).is_ok());
        assert!(normalize_entry_name(&"a".repeat(256)).is_err());
    }
}
