//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A document stored in the portal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The menu this file belongs to.
    pub menu_id: Uuid,
    /// The folder containing this file (null = menu root).
    pub folder_id: Option<Uuid>,
    /// Original file name (including extension).
    pub name: String,
    /// The path within the storage provider.
    pub storage_path: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Lowercase extension, e.g. `pdf`.
    pub file_type: String,
    /// The user who uploaded the file.
    pub uploaded_by: Uuid,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Size in bytes as an unsigned value.
    pub fn size(&self) -> u64 {
        u64::try_from(self.size_bytes).unwrap_or(0)
    }
}

/// A file joined with its uploader's display name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileWithUploader {
    /// The file row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub file: File,
    /// Uploader display name (null if the uploader row is gone).
    pub uploader_name: Option<String>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// Pre-generated identifier, also used in the storage path.
    pub id: Uuid,
    /// Owning menu.
    pub menu_id: Uuid,
    /// Containing folder (None for menu root).
    pub folder_id: Option<Uuid>,
    /// Original file name.
    pub name: String,
    /// The path within the storage provider.
    pub storage_path: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Lowercase extension.
    pub file_type: String,
    /// The uploading user.
    pub uploaded_by: Uuid,
}
