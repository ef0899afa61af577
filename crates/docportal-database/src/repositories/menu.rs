//! Menu repository implementation.

use sqlx::PgPool;

use docportal_core::error::{AppError, ErrorKind};
use docportal_core::result::AppResult;
use docportal_entity::menu::{Menu, MenuSlug};

/// Repository for the seeded menu rows.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    /// Create a new menu repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a slug to its menu row.
    pub async fn find_by_slug(&self, slug: MenuSlug) -> AppResult<Option<Menu>> {
        sqlx::query_as::<_, Menu>("SELECT id, name, parent_id FROM menus WHERE name = $1")
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find menu", e))
    }

    /// List all menus ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<Menu>> {
        sqlx::query_as::<_, Menu>("SELECT id, name, parent_id FROM menus ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list menus", e))
    }
}
