//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::tree::FolderLink;

/// A folder in a menu's document hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// The menu this folder belongs to.
    pub menu_id: Uuid,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
    /// The user who created the folder.
    pub created_by: Uuid,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The adjacency link of this folder.
    pub fn link(&self) -> FolderLink {
        FolderLink {
            id: self.id,
            parent_id: self.parent_id,
            name: self.name.clone(),
        }
    }
}

/// A folder joined with its creator's display name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FolderWithCreator {
    /// The folder row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub folder: Folder,
    /// Creator display name (null if the creator row is gone).
    pub creator_name: Option<String>,
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Owning menu.
    pub menu_id: Uuid,
    /// Parent folder (None for root).
    pub parent_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
    /// The creating user.
    pub created_by: Uuid,
}
