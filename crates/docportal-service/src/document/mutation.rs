//! Folder creation, upload, download, rename, and delete under a menu.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use docportal_auth::rbac::{Capability, RbacEnforcer};
use docportal_core::config::StorageConfig;
use docportal_core::error::AppError;
use docportal_core::traits::storage::ByteStream;
use docportal_database::repositories::{
    ActivityLogRepository, FileRepository, FolderRepository, MenuRepository,
};
use docportal_database::transaction;
use docportal_entity::activity::{ActivityAction, CreateActivityLog};
use docportal_entity::file::{
    ALLOWED_EXTENSIONS, CreateFile, EntryType, File, extension_of, is_allowed_extension,
    mime_type_for,
};
use docportal_entity::folder::{CreateFolder, Folder, FolderTree};
use docportal_entity::menu::{Menu, MenuSlug};
use docportal_storage::StorageManager;

use super::{normalize_entry_name, resolve_menu};
use crate::context::RequestContext;

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original client-side file name.
    pub name: String,
    /// File content.
    pub data: Bytes,
}

/// An opened download.
pub struct DownloadResult {
    /// File metadata.
    pub file: File,
    /// File content.
    pub stream: ByteStream,
    /// Content type for the response.
    pub content_type: &'static str,
}

impl std::fmt::Debug for DownloadResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadResult")
            .field("file", &self.file.id)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// The renamed entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamedEntry {
    /// Entry ID.
    pub id: Uuid,
    /// The new name.
    pub name: String,
    /// `folder` or `file`.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

/// Rows removed by a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    /// Folders removed.
    pub folders: u64,
    /// Files removed.
    pub files: u64,
}

/// Mutates folders and files.
#[derive(Debug, Clone)]
pub struct DocumentMutationService {
    /// Pool for multi-row transactions.
    pool: PgPool,
    /// Menu repository.
    menu_repo: Arc<MenuRepository>,
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Activity log repository.
    activity_repo: Arc<ActivityLogRepository>,
    /// Blob storage.
    storage: Arc<StorageManager>,
    /// Capability policy.
    rbac: Arc<RbacEnforcer>,
    /// Storage configuration.
    config: StorageConfig,
}

impl DocumentMutationService {
    /// Creates a new mutation service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        menu_repo: Arc<MenuRepository>,
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        activity_repo: Arc<ActivityLogRepository>,
        storage: Arc<StorageManager>,
        rbac: Arc<RbacEnforcer>,
        config: StorageConfig,
    ) -> Self {
        Self {
            pool,
            menu_repo,
            folder_repo,
            file_repo,
            activity_repo,
            storage,
            rbac,
            config,
        }
    }

    /// Creates a folder at the menu root or under `parent_id`.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        slug: MenuSlug,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> Result<Folder, AppError> {
        self.rbac.require(&ctx.actor(), Capability::CreateFolder)?;

        let name = normalize_entry_name(name)?;
        let menu = resolve_menu(&self.menu_repo, slug).await?;
        if let Some(parent_id) = parent_id {
            self.target_folder(&menu, parent_id, "parent folder").await?;
        }

        let folder = self
            .folder_repo
            .create(&CreateFolder {
                menu_id: menu.id,
                parent_id,
                name,
                created_by: ctx.user_id,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            menu = %slug,
            "Folder created"
        );
        Ok(folder)
    }

    /// Stores an uploaded file and records the upload.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        slug: MenuSlug,
        folder_id: Option<Uuid>,
        upload: UploadedFile,
    ) -> Result<File, AppError> {
        self.rbac.require(&ctx.actor(), Capability::UploadFile)?;

        let name = normalize_entry_name(&upload.name)?;
        let file_type = extension_of(&name)
            .filter(|ext| is_allowed_extension(ext))
            .ok_or_else(|| {
                AppError::validation(format!(
                    "The file must be a file of type: {}.",
                    ALLOWED_EXTENSIONS.join(", ")
                ))
            })?;
        if upload.data.is_empty() {
            return Err(AppError::validation("The uploaded file is empty."));
        }
        if upload.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "The file must not be greater than {} bytes.",
                self.config.max_upload_size_bytes
            )));
        }

        let menu = resolve_menu(&self.menu_repo, slug).await?;
        if let Some(folder_id) = folder_id {
            self.target_folder(&menu, folder_id, "folder").await?;
        }

        let id = Uuid::new_v4();
        let record = CreateFile {
            id,
            menu_id: menu.id,
            folder_id,
            name,
            storage_path: format!("{}/{id}.{file_type}", slug.storage_prefix()),
            size_bytes: upload.data.len() as i64,
            file_type,
            uploaded_by: ctx.user_id,
        };

        let file = self
            .storage
            .put_then(&record.storage_path, upload.data, || self.record_upload(&record))
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            menu = %slug,
            size = file.size_bytes,
            "File uploaded"
        );
        Ok(file)
    }

    /// Opens a file for download and records the download.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<DownloadResult, AppError> {
        self.rbac.require(&ctx.actor(), Capability::DownloadFile)?;

        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let stream = self.storage.open(&file.storage_path).await?;

        self.activity_repo
            .create(&CreateActivityLog {
                user_id: ctx.user_id,
                file_id: file.id,
                action: ActivityAction::Download,
            })
            .await?;

        info!(user_id = %ctx.user_id, file_id = %file.id, "File downloaded");

        Ok(DownloadResult {
            content_type: mime_type_for(&file.file_type),
            file,
            stream,
        })
    }

    /// Renames a folder or file.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        slug: MenuSlug,
        id: Uuid,
        entry_type: EntryType,
        name: &str,
    ) -> Result<RenamedEntry, AppError> {
        let menu = resolve_menu(&self.menu_repo, slug).await?;
        let actor = ctx.actor();

        let renamed = match entry_type {
            EntryType::Folder => {
                let folder = self.folder_in_menu(&menu, id).await?;
                self.rbac
                    .require_on(&actor, Some(folder.created_by), Capability::ModifyEntry)?;
                let name = normalize_entry_name(name)?;
                self.folder_repo.rename(folder.id, &name).await?.name
            }
            EntryType::File => {
                let file = self.file_in_menu(&menu, id).await?;
                self.rbac
                    .require_on(&actor, Some(file.uploaded_by), Capability::ModifyEntry)?;
                let name = normalize_entry_name(name)?;
                self.file_repo.rename(file.id, &name).await?.name
            }
        };

        info!(
            user_id = %ctx.user_id,
            entry_id = %id,
            entry_type = %entry_type,
            "Entry renamed"
        );
        Ok(RenamedEntry {
            id,
            name: renamed,
            entry_type,
        })
    }

    /// Deletes a file, or a folder with everything beneath it.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        slug: MenuSlug,
        id: Uuid,
        entry_type: EntryType,
    ) -> Result<DeleteSummary, AppError> {
        let menu = resolve_menu(&self.menu_repo, slug).await?;
        let actor = ctx.actor();

        let summary = match entry_type {
            EntryType::File => {
                let file = self.file_in_menu(&menu, id).await?;
                self.rbac
                    .require_on(&actor, Some(file.uploaded_by), Capability::ModifyEntry)?;
                self.delete_file(&file).await?
            }
            EntryType::Folder => {
                let folder = self.folder_in_menu(&menu, id).await?;
                self.rbac
                    .require_on(&actor, Some(folder.created_by), Capability::ModifyEntry)?;
                self.delete_folder(&menu, &folder).await?
            }
        };

        info!(
            user_id = %ctx.user_id,
            entry_id = %id,
            entry_type = %entry_type,
            folders = summary.folders,
            files = summary.files,
            "Entry deleted"
        );
        Ok(summary)
    }

    async fn record_upload(&self, record: &CreateFile) -> Result<File, AppError> {
        let mut tx = transaction::begin(&self.pool).await?;
        let file = self.file_repo.create_in(&mut tx, record).await?;
        self.activity_repo
            .create_in(
                &mut tx,
                &CreateActivityLog {
                    user_id: record.uploaded_by,
                    file_id: file.id,
                    action: ActivityAction::Upload,
                },
            )
            .await?;
        transaction::commit(tx).await?;
        Ok(file)
    }

    async fn delete_file(&self, file: &File) -> Result<DeleteSummary, AppError> {
        if !self.file_repo.delete(file.id).await? {
            return Err(AppError::not_found("File not found"));
        }
        self.storage.remove_all([file.storage_path.as_str()]).await;
        Ok(DeleteSummary {
            folders: 0,
            files: 1,
        })
    }

    async fn delete_folder(&self, menu: &Menu, folder: &Folder) -> Result<DeleteSummary, AppError> {
        let tree = FolderTree::new(self.folder_repo.find_links_by_menu(menu.id).await?);
        let subtree = tree.subtree(folder.id);

        let mut tx = transaction::begin(&self.pool).await?;
        let files = self
            .file_repo
            .find_for_removal_in(&mut tx, &subtree, &[])
            .await?;
        let file_ids: Vec<Uuid> = files.iter().map(|f| f.id).collect();
        let removed_files = self.file_repo.delete_many_in(&mut tx, &file_ids).await?;
        let removed_folders = self.folder_repo.delete_many_in(&mut tx, &subtree).await?;
        transaction::commit(tx).await?;

        self.storage
            .remove_all(files.iter().map(|f| f.storage_path.as_str()).collect::<Vec<&str>>())
            .await;

        Ok(DeleteSummary {
            folders: removed_folders,
            files: removed_files,
        })
    }

    /// A folder new content goes into: missing is not-found, another
    /// menu's folder is invalid input.
    async fn target_folder(&self, menu: &Menu, id: Uuid, what: &str) -> Result<Folder, AppError> {
        let folder = self
            .folder_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("The selected {what} does not exist.")))?;
        if folder.menu_id != menu.id {
            return Err(AppError::validation(format!(
                "The selected {what} belongs to another menu."
            )));
        }
        Ok(folder)
    }

    async fn folder_in_menu(&self, menu: &Menu, id: Uuid) -> Result<Folder, AppError> {
        self.folder_repo
            .find_by_id(id)
            .await?
            .filter(|folder| folder.menu_id == menu.id)
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    async fn file_in_menu(&self, menu: &Menu, id: Uuid) -> Result<File, AppError> {
        self.file_repo
            .find_by_id(id)
            .await?
            .filter(|file| file.menu_id == menu.id)
            .ok_or_else(|| AppError::not_found("File not found"))
    }
}
