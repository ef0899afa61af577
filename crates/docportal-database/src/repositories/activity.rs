//! Activity log repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use docportal_core::error::{AppError, ErrorKind};
use docportal_core::result::AppResult;
use docportal_core::types::pagination::{PageRequest, PageResponse};
use docportal_entity::activity::{
    ActivityAction, ActivityLog, ActivityLogView, CreateActivityLog,
};

/// Repository for the append-only activity log.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    /// Create a new activity log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry.
    pub async fn create(&self, data: &CreateActivityLog) -> AppResult<ActivityLog> {
        sqlx::query_as::<_, ActivityLog>(
            "INSERT INTO activity_logs (user_id, file_id, action) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.file_id)
        .bind(data.action)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record activity", e))
    }

    /// Append an entry inside an open transaction.
    pub async fn create_in(
        &self,
        conn: &mut PgConnection,
        data: &CreateActivityLog,
    ) -> AppResult<ActivityLog> {
        sqlx::query_as::<_, ActivityLog>(
            "INSERT INTO activity_logs (user_id, file_id, action) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.file_id)
        .bind(data.action)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record activity", e))
    }

    /// Newest-first page of entries with user and file names.
    pub async fn search(
        &self,
        action: Option<ActivityAction>,
        user_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityLogView>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if action.is_some() {
            conditions.push(format!("a.action = ${param_idx}"));
            param_idx += 1;
        }
        if user_id.is_some() {
            conditions.push(format!("a.user_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM activity_logs a {where_clause}");
        let select_sql = format!(
            "SELECT a.*, u.name AS user_name, f.name AS file_name FROM activity_logs a \
             INNER JOIN users u ON u.id = a.user_id \
             INNER JOIN files f ON f.id = a.file_id \
             {where_clause} ORDER BY a.occurred_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, ActivityLogView>(&select_sql);

        if let Some(a) = action {
            count_query = count_query.bind(a);
            select_query = select_query.bind(a);
        }
        if let Some(uid) = user_id {
            count_query = count_query.bind(uid);
            select_query = select_query.bind(uid);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count activity entries", e)
        })?;

        let entries = select_query
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list activity entries", e)
            })?;

        Ok(PageResponse::new(entries, *page, total as u64))
    }

    /// Delete every entry recorded for the given users inside an open
    /// transaction.
    pub async fn delete_by_users_in(
        &self,
        conn: &mut PgConnection,
        user_ids: &[Uuid],
    ) -> AppResult<u64> {
        sqlx::query("DELETE FROM activity_logs WHERE user_id = ANY($1)")
            .bind(user_ids)
            .execute(&mut *conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete activity entries", e)
            })
    }
}
