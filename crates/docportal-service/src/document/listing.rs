//! Combined folder and file listing for one level of a menu.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use docportal_auth::rbac::{Actor, Capability, RbacEnforcer};
use docportal_core::error::AppError;
use docportal_core::types::pagination::{PageRequest, PageResponse};
use docportal_core::types::query::empty_as_none;
use docportal_core::types::size::format_size;
use docportal_database::repositories::file::{FileLevelFilter, FileRepository};
use docportal_database::repositories::{FolderRepository, MenuRepository};
use docportal_entity::file::{EntryType, FileWithUploader, mime_type_for};
use docportal_entity::folder::{Breadcrumb, FolderTree, FolderWithCreator};
use docportal_entity::menu::MenuSlug;

use super::resolve_menu;
use crate::context::RequestContext;

/// Display name used when an owner row no longer resolves.
const UNKNOWN_OWNER: &str = "Unknown";

/// Listing parameters as received from the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Case-insensitive name substring.
    pub search: Option<String>,
    /// Extension filter; `all` and `folder` are special.
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    /// Folder whose contents are listed; menu root when absent or empty.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub folder_id: Option<Uuid>,
    /// 1-based page number; values below 1 mean the first page.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
}

/// How the `type` parameter restricts the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    /// Folders and files of every type.
    Any,
    /// Folders only.
    FoldersOnly,
    /// Folders plus files with this lowercase extension.
    Extension(String),
}

impl TypeFilter {
    /// Interpret a raw `type` parameter. Empty and `all` mean no filter.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Any;
        };
        match value.to_lowercase().as_str() {
            "all" => Self::Any,
            "folder" => Self::FoldersOnly,
            ext => Self::Extension(ext.to_string()),
        }
    }

    fn extension(&self) -> Option<&str> {
        match self {
            Self::Extension(ext) => Some(ext),
            _ => None,
        }
    }
}

/// One row of a document listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Folder or file ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// `folder` or `file`.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Human-readable size; aggregate over the subtree for folders.
    pub size: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last update, formatted `DD Mon YYYY`.
    pub date: String,
    /// Folder creator name.
    pub creator: Option<String>,
    /// File uploader name.
    pub uploader: Option<String>,
    /// File extension, or `folder`.
    pub file_type: String,
    /// Content type served on download (files only).
    pub mime_type: Option<String>,
    /// Whether the viewer may rename or delete the entry.
    pub can_delete: bool,
}

/// Filters echoed back with a listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFilters {
    /// The search term, if any.
    pub search: Option<String>,
    /// The raw type filter, if any.
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    /// The listed folder, if any.
    pub folder_id: Option<Uuid>,
}

/// A paginated listing of one level of a menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListing {
    /// The listed menu.
    pub menu: MenuSlug,
    /// The listed folder, when not at the menu root.
    pub current_folder: Option<Breadcrumb>,
    /// Root-to-current trail; empty at the menu root.
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Applied filters.
    pub filters: ListingFilters,
    /// The requested page of entries.
    pub documents: PageResponse<DocumentEntry>,
}

/// Builds document listings.
#[derive(Debug, Clone)]
pub struct DocumentListingService {
    /// Menu repository.
    menu_repo: Arc<MenuRepository>,
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Capability policy.
    rbac: Arc<RbacEnforcer>,
}

impl DocumentListingService {
    /// Creates a new listing service.
    pub fn new(
        menu_repo: Arc<MenuRepository>,
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            menu_repo,
            folder_repo,
            file_repo,
            rbac,
        }
    }

    /// Lists the folders and files of one level of a menu.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        slug: MenuSlug,
        query: ListingQuery,
    ) -> Result<DocumentListing, AppError> {
        if !ctx.verified {
            return Err(AppError::authorization("Account is pending verification"));
        }

        let menu = resolve_menu(&self.menu_repo, slug).await?;
        let tree = FolderTree::new(self.folder_repo.find_links_by_menu(menu.id).await?);

        let breadcrumbs = match query.folder_id {
            Some(folder_id) if !tree.contains(folder_id) => {
                return Err(AppError::not_found("Folder not found"));
            }
            Some(folder_id) => tree.breadcrumbs(folder_id)?,
            None => Vec::new(),
        };

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let type_filter = TypeFilter::parse(query.file_type.as_deref());

        let folders = self
            .folder_repo
            .find_level(menu.id, query.folder_id, search)
            .await?;

        let sizes = if folders.is_empty() {
            HashMap::new()
        } else {
            let direct = self.file_repo.direct_sizes_by_menu(menu.id).await?;
            tree.aggregate_sizes(&direct)
        };

        let files = if type_filter == TypeFilter::FoldersOnly {
            Vec::new()
        } else {
            let filter = FileLevelFilter {
                folder_id: query.folder_id,
                search,
                file_type: type_filter.extension(),
            };
            self.file_repo.find_level(menu.id, &filter).await?
        };

        debug!(
            menu = %slug,
            folder_id = ?query.folder_id,
            folders = folders.len(),
            files = files.len(),
            "Composed document listing"
        );

        let entries = compose_entries(&self.rbac, &ctx.actor(), folders, &sizes, files);
        let page = PageRequest::page(query.page.unwrap_or(1).max(1) as u64);

        Ok(DocumentListing {
            menu: slug,
            current_folder: breadcrumbs.last().cloned(),
            breadcrumbs,
            filters: ListingFilters {
                search: query.search,
                file_type: query.file_type,
                folder_id: query.folder_id,
            },
            documents: page.paginate(entries),
        })
    }
}

/// Format a timestamp the way listings show it, e.g. `07 Mar 2025`.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y").to_string()
}

/// Build a listing row for a folder with its aggregate size.
pub fn folder_entry(row: FolderWithCreator, size_bytes: u64, can_delete: bool) -> DocumentEntry {
    DocumentEntry {
        id: row.folder.id,
        name: row.folder.name,
        entry_type: EntryType::Folder,
        size: format_size(size_bytes),
        size_bytes,
        date: format_date(row.folder.updated_at),
        creator: Some(row.creator_name.unwrap_or_else(|| UNKNOWN_OWNER.to_string())),
        uploader: None,
        file_type: EntryType::Folder.to_string(),
        mime_type: None,
        can_delete,
    }
}

/// Build a listing row for a file.
pub fn file_entry(row: FileWithUploader, can_delete: bool) -> DocumentEntry {
    let size_bytes = row.file.size();
    DocumentEntry {
        id: row.file.id,
        mime_type: Some(mime_type_for(&row.file.file_type).to_string()),
        name: row.file.name,
        entry_type: EntryType::File,
        size: format_size(size_bytes),
        size_bytes,
        date: format_date(row.file.updated_at),
        creator: None,
        uploader: Some(row.uploader_name.unwrap_or_else(|| UNKNOWN_OWNER.to_string())),
        file_type: row.file.file_type,
        can_delete,
    }
}

/// Concatenate folders then files and stable-sort by name (byte order).
pub fn merge_entries(folders: Vec<DocumentEntry>, files: Vec<DocumentEntry>) -> Vec<DocumentEntry> {
    let mut entries = folders;
    entries.extend(files);
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Turn one level of rows into sorted listing entries for `actor`.
///
/// Folders missing from `sizes` hold no files anywhere in their subtree.
pub fn compose_entries(
    rbac: &RbacEnforcer,
    actor: &Actor,
    folders: Vec<FolderWithCreator>,
    sizes: &HashMap<Uuid, u64>,
    files: Vec<FileWithUploader>,
) -> Vec<DocumentEntry> {
    let folder_entries = folders
        .into_iter()
        .map(|row| {
            let size = sizes.get(&row.folder.id).copied().unwrap_or(0);
            let can_delete =
                rbac.allows(actor, Some(row.folder.created_by), Capability::ModifyEntry);
            folder_entry(row, size, can_delete)
        })
        .collect();

    let file_entries = files
        .into_iter()
        .map(|row| {
            let can_delete =
                rbac.allows(actor, Some(row.file.uploaded_by), Capability::ModifyEntry);
            file_entry(row, can_delete)
        })
        .collect();

    merge_entries(folder_entries, file_entries)
}
