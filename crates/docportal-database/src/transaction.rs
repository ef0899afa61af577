//! Transaction helpers.
//!
//! Repositories expose `*_in` methods taking a `&mut PgConnection` so that
//! services can run several of them inside one transaction.

use sqlx::{PgPool, Postgres, Transaction};

use docportal_core::error::{AppError, ErrorKind};
use docportal_core::result::AppResult;

/// An open PostgreSQL transaction.
pub type Tx = Transaction<'static, Postgres>;

/// Begin a transaction on the pool.
pub async fn begin(pool: &PgPool) -> AppResult<Tx> {
    pool.begin()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
}

/// Commit a transaction.
pub async fn commit(tx: Tx) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
}
