//! Removal of users together with everything they own.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use docportal_core::error::AppError;
use docportal_database::repositories::{
    ActivityLogRepository, FileRepository, FolderRepository, UserRepository,
};
use docportal_database::transaction;
use docportal_entity::folder::FolderTree;
use docportal_storage::StorageManager;

/// Rows removed by a user cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CascadeSummary {
    /// Users removed.
    pub users: u64,
    /// Folders removed.
    pub folders: u64,
    /// Files removed.
    pub files: u64,
    /// Activity entries removed.
    pub activity_entries: u64,
}

/// Deletes users along with their folder subtrees, files, and activity.
#[derive(Debug, Clone)]
pub struct UserCascade {
    /// Pool for the cascade transaction.
    pool: PgPool,
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Activity log repository.
    activity_repo: Arc<ActivityLogRepository>,
    /// Blob storage.
    storage: Arc<StorageManager>,
}

impl UserCascade {
    /// Creates a new cascade.
    pub fn new(
        pool: PgPool,
        user_repo: Arc<UserRepository>,
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        activity_repo: Arc<ActivityLogRepository>,
        storage: Arc<StorageManager>,
    ) -> Self {
        Self {
            pool,
            user_repo,
            folder_repo,
            file_repo,
            activity_repo,
            storage,
        }
    }

    /// Delete the given users in one transaction, then their blobs.
    ///
    /// Removes every folder subtree rooted at a folder the users created
    /// (including other users' content inside it), every file they uploaded
    /// anywhere, and their activity entries.
    pub async fn delete_users(&self, user_ids: &[Uuid]) -> Result<CascadeSummary, AppError> {
        if user_ids.is_empty() {
            return Ok(CascadeSummary::default());
        }

        let tree = FolderTree::new(self.folder_repo.find_all_links().await?);
        let owned_roots = self.folder_repo.find_ids_created_by(user_ids).await?;
        let folder_ids = tree.subtrees(owned_roots);

        let mut tx = transaction::begin(&self.pool).await?;
        let files = self
            .file_repo
            .find_for_removal_in(&mut tx, &folder_ids, user_ids)
            .await?;
        let file_ids: Vec<Uuid> = files.iter().map(|f| f.id).collect();

        let activity_entries = self
            .activity_repo
            .delete_by_users_in(&mut tx, user_ids)
            .await?;
        let removed_files = self.file_repo.delete_many_in(&mut tx, &file_ids).await?;
        let removed_folders = self.folder_repo.delete_many_in(&mut tx, &folder_ids).await?;
        let removed_users = self.user_repo.delete_many_in(&mut tx, user_ids).await?;
        transaction::commit(tx).await?;

        let orphaned = self
            .storage
            .remove_all(files.iter().map(|f| f.storage_path.as_str()).collect::<Vec<&str>>())
            .await;

        info!(
            users = removed_users,
            folders = removed_folders,
            files = removed_files,
            orphaned_blobs = orphaned,
            "Users deleted with owned content"
        );

        Ok(CascadeSummary {
            users: removed_users,
            folders: removed_folders,
            files: removed_files,
            activity_entries,
        })
    }
}
