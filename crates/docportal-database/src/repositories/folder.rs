//! Folder repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use docportal_core::error::{AppError, ErrorKind};
use docportal_core::result::AppResult;
use docportal_entity::folder::{CreateFolder, Folder, FolderLink, FolderWithCreator};

use super::contains_pattern;

/// Repository for folder CRUD and hierarchy queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Parent links of every folder in a menu, ordered by name.
    pub async fn find_links_by_menu(&self, menu_id: Uuid) -> AppResult<Vec<FolderLink>> {
        sqlx::query_as::<_, FolderLink>(
            "SELECT id, parent_id, name FROM folders WHERE menu_id = $1 ORDER BY name ASC",
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load folder tree", e))
    }

    /// Parent links of every folder in every menu.
    pub async fn find_all_links(&self) -> AppResult<Vec<FolderLink>> {
        sqlx::query_as::<_, FolderLink>("SELECT id, parent_id, name FROM folders")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load folder tree", e)
            })
    }

    /// Folders of one level of a menu, with creator names.
    ///
    /// `parent_id = None` selects root folders. `search` filters names by
    /// case-insensitive substring.
    pub async fn find_level(
        &self,
        menu_id: Uuid,
        parent_id: Option<Uuid>,
        search: Option<&str>,
    ) -> AppResult<Vec<FolderWithCreator>> {
        let mut sql = String::from(
            "SELECT f.*, u.name AS creator_name FROM folders f \
             LEFT JOIN users u ON u.id = f.created_by \
             WHERE f.menu_id = $1 AND f.parent_id IS NOT DISTINCT FROM $2",
        );
        if search.is_some() {
            sql.push_str(" AND f.name ILIKE $3");
        }
        sql.push_str(" ORDER BY f.name ASC");

        let mut query = sqlx::query_as::<_, FolderWithCreator>(&sql)
            .bind(menu_id)
            .bind(parent_id);
        if let Some(term) = search {
            query = query.bind(contains_pattern(term));
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// IDs of every folder created by any of the given users.
    pub async fn find_ids_created_by(&self, user_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM folders WHERE created_by = ANY($1)")
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list owned folders", e)
            })
    }

    /// Create a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (menu_id, parent_id, name, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.menu_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("folders_parent_id_fkey") =>
            {
                AppError::not_found("Parent folder not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    /// Rename a folder.
    pub async fn rename(&self, id: Uuid, name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Delete folders inside an open transaction. Returns the number removed.
    pub async fn delete_many_in(&self, conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<u64> {
        sqlx::query("DELETE FROM folders WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut *conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folders", e))
    }
}
