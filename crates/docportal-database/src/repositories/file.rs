//! File repository implementation.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use docportal_core::error::{AppError, ErrorKind};
use docportal_core::result::AppResult;
use docportal_entity::file::{CreateFile, File, FileWithUploader};

use super::contains_pattern;

/// Filters applied to one level of a document listing.
#[derive(Debug, Clone, Default)]
pub struct FileLevelFilter<'a> {
    /// Containing folder, `None` for files at the menu root.
    pub folder_id: Option<Uuid>,
    /// Case-insensitive substring of the file name.
    pub search: Option<&'a str>,
    /// Exact (lowercase) extension.
    pub file_type: Option<&'a str>,
}

/// Repository for document file rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Files of one level of a menu, with uploader names.
    pub async fn find_level(
        &self,
        menu_id: Uuid,
        filter: &FileLevelFilter<'_>,
    ) -> AppResult<Vec<FileWithUploader>> {
        let mut sql = String::from(
            "SELECT f.*, u.name AS uploader_name FROM files f \
             LEFT JOIN users u ON u.id = f.uploaded_by \
             WHERE f.menu_id = $1 AND f.folder_id IS NOT DISTINCT FROM $2",
        );
        let mut param_idx = 3u32;
        if filter.search.is_some() {
            sql.push_str(&format!(" AND f.name ILIKE ${param_idx}"));
            param_idx += 1;
        }
        if filter.file_type.is_some() {
            sql.push_str(&format!(" AND f.file_type = ${param_idx}"));
        }
        sql.push_str(" ORDER BY f.name ASC");

        let mut query = sqlx::query_as::<_, FileWithUploader>(&sql)
            .bind(menu_id)
            .bind(filter.folder_id);
        if let Some(term) = filter.search {
            query = query.bind(contains_pattern(term));
        }
        if let Some(file_type) = filter.file_type {
            query = query.bind(file_type.to_lowercase());
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// Bytes of the files directly inside each folder of a menu.
    ///
    /// Folders without files are absent from the map.
    pub async fn direct_sizes_by_menu(&self, menu_id: Uuid) -> AppResult<HashMap<Uuid, u64>> {
        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT folder_id, COALESCE(SUM(size_bytes), 0)::BIGINT FROM files \
             WHERE menu_id = $1 AND folder_id IS NOT NULL GROUP BY folder_id",
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate folder sizes", e)
        })?;

        Ok(rows
            .into_iter()
            .map(|(folder_id, bytes)| (folder_id, u64::try_from(bytes).unwrap_or(0)))
            .collect())
    }

    /// Files that sit in any of `folder_ids` or were uploaded by any of
    /// `uploader_ids`, read inside an open transaction.
    pub async fn find_for_removal_in(
        &self,
        conn: &mut PgConnection,
        folder_ids: &[Uuid],
        uploader_ids: &[Uuid],
    ) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE folder_id = ANY($1) OR uploaded_by = ANY($2)",
        )
        .bind(folder_ids)
        .bind(uploader_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to collect files for removal", e)
        })
    }

    /// Insert a file row inside an open transaction.
    pub async fn create_in(&self, conn: &mut PgConnection, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files \
                (id, menu_id, folder_id, name, storage_path, size_bytes, file_type, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.id)
        .bind(data.menu_id)
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(&data.storage_path)
        .bind(data.size_bytes)
        .bind(&data.file_type)
        .bind(data.uploaded_by)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("files_folder_id_fkey") =>
            {
                AppError::not_found("Folder not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    /// Rename a file.
    pub async fn rename(&self, id: Uuid, name: &str) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// Delete a single file row. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))
    }

    /// Delete file rows inside an open transaction. Returns the number removed.
    pub async fn delete_many_in(&self, conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<u64> {
        sqlx::query("DELETE FROM files WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut *conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete files", e))
    }
}
