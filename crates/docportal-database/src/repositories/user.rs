//! User repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use docportal_core::error::{AppError, ErrorKind};
use docportal_core::result::AppResult;
use docportal_core::types::pagination::{PageRequest, PageResponse};
use docportal_entity::user::{CreateUser, UpdateUser, User, UserWithRole};

const SELECT_WITH_ROLE: &str =
    "SELECT u.*, r.name AS role_name FROM users u INNER JOIN roles r ON r.id = u.role_id";

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user joined with its role name.
    pub async fn find_with_role(&self, id: Uuid) -> AppResult<Option<UserWithRole>> {
        sqlx::query_as::<_, UserWithRole>(&format!("{SELECT_WITH_ROLE} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// Find a user by email (case-insensitive), joined with its role name.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserWithRole>> {
        sqlx::query_as::<_, UserWithRole>(&format!(
            "{SELECT_WITH_ROLE} WHERE LOWER(u.email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by email", e))
    }

    /// Check whether an email is taken, optionally ignoring one user.
    pub async fn email_exists(&self, email: &str, excluding: Option<Uuid>) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) \
             AND ($2::UUID IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check email", e))
    }

    /// List users with their role names, ordered by name.
    pub async fn find_page(&self, page: &PageRequest) -> AppResult<PageResponse<UserWithRole>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;

        let users = sqlx::query_as::<_, UserWithRole>(&format!(
            "{SELECT_WITH_ROLE} ORDER BY u.name ASC, u.id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        Ok(PageResponse::new(users, *page, total as u64))
    }

    /// List every user with role names, ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<UserWithRole>> {
        sqlx::query_as::<_, UserWithRole>(&format!("{SELECT_WITH_ROLE} ORDER BY u.name ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    /// Return which of the given ids exist.
    pub async fn find_existing_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up users", e))
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create user"))
    }

    /// Apply a partial update. Unset fields keep their current value.
    pub async fn update(&self, id: Uuid, data: &UpdateUser) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                password_hash = COALESCE($4, password_hash), \
                role_id = COALESCE($5, role_id), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update user"))
    }

    /// Mark a user as verified. Keeps an existing verification timestamp.
    pub async fn verify(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                email_verified_at = COALESCE(email_verified_at, NOW()), \
                updated_at = CASE WHEN email_verified_at IS NULL THEN NOW() ELSE updated_at END \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to verify user", e))
    }

    /// Delete users inside an open transaction. Returns the number removed.
    pub async fn delete_many_in(&self, conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<u64> {
        sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut *conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete users", e))
    }
}

fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
            AppError::validation("The email has already been taken.")
        }
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_role_id_fkey") => {
            AppError::validation("The selected role is invalid.")
        }
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}
