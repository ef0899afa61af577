//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use docportal_auth::jwt::JwtDecoder;
use docportal_core::config::AppConfig;
use docportal_service::{
    AccountService, ActivityLogService, DocumentListingService, DocumentMutationService,
    UserManagementService,
};
use docportal_storage::StorageManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Blob storage
    pub storage_manager: Arc<StorageManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Registration, login, and token-to-user resolution
    pub account_service: Arc<AccountService>,
    /// Document listings
    pub listing_service: Arc<DocumentListingService>,
    /// Folder and file mutations
    pub mutation_service: Arc<DocumentMutationService>,
    /// Admin user management
    pub user_service: Arc<UserManagementService>,
    /// Activity log browsing
    pub activity_service: Arc<ActivityLogService>,
}
