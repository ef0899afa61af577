//! Entry kinds and accepted document types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use docportal_core::AppError;

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 14] = [
    "jpg", "jpeg", "png", "pdf", "xls", "xlsx", "doc", "docx", "zip", "rar", "txt", "csv", "ppt",
    "pptx",
];

/// Kind of a document listing entry, also used as a route segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A file.
    File,
    /// A folder.
    Folder,
}

impl EntryType {
    /// Return the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            _ => Err(AppError::validation(format!(
                "Invalid entry type '{s}'. Expected one of: file, folder"
            ))),
        }
    }
}

/// Lowercase extension of a file name, if it has one.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Check an extension (any case) against [`ALLOWED_EXTENSIONS`].
pub fn is_allowed_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

/// Content type served for a stored document.
pub fn mime_type_for(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "txt" => "text/plain",
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.PDF").as_deref(), Some("pdf"));
        assert_eq!(extension_of("archive.tar.zip").as_deref(), Some("zip"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".env"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_allow_list() {
        assert!(is_allowed_extension("pdf"));
        assert!(is_allowed_extension("XLSX"));
        assert!(!is_allowed_extension("exe"));
        assert!(!is_allowed_extension("svg"));
    }

    #[test]
    fn test_entry_type_parse() {
        assert_eq!("file".parse::<EntryType>().ok(), Some(EntryType::File));
        assert_eq!("folder".parse::<EntryType>().ok(), Some(EntryType::Folder));
        assert!("dir".parse::<EntryType>().is_err());
    }

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_type_for("pdf"), "application/pdf");
        assert_eq!(mime_type_for("PNG"), "image/png");
        assert_eq!(mime_type_for("bin"), "application/octet-stream");
    }
}
