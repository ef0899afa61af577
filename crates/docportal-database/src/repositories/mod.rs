//! Repository implementations for all DocPortal entities.

pub mod activity;
pub mod file;
pub mod folder;
pub mod menu;
pub mod role;
pub mod user;

pub use activity::ActivityLogRepository;
pub use file::FileRepository;
pub use folder::FolderRepository;
pub use menu::MenuRepository;
pub use role::RoleRepository;
pub use user::UserRepository;

/// Build an `ILIKE` pattern matching `term` anywhere, with `%`, `_` and
/// `\` in the term matched literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("report"), "%report%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
