//! Application builder: wires repositories, services, router, and
//! middleware into an Axum app.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use sqlx::PgPool;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use docportal_auth::jwt::{JwtDecoder, JwtEncoder};
use docportal_auth::password::{PasswordHasher, PasswordValidator};
use docportal_auth::rbac::RbacEnforcer;
use docportal_core::config::AppConfig;
use docportal_core::error::AppError;
use docportal_database::migration::run_migrations;
use docportal_database::repositories::{
    ActivityLogRepository, FileRepository, FolderRepository, MenuRepository, RoleRepository,
    UserRepository,
};
use docportal_service::{
    AccountService, ActivityLogService, DocumentListingService, DocumentMutationService,
    UserCascade, UserManagementService,
};
use docportal_storage::StorageManager;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Room left in the body limit for multipart framing around the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    let body_limit =
        usize::try_from(config.storage.max_upload_size_bytes).unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD_BYTES);

    build_router(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(build_compression_layer())
        .layer(build_cors_layer(&config.server.cors))
        .layer(axum::middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
}

/// Builds repositories, auth components, and services over a pool and
/// storage manager.
pub fn build_state(config: AppConfig, db_pool: PgPool, storage: Arc<StorageManager>) -> AppState {
    // ── Repositories ─────────────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let role_repo = Arc::new(RoleRepository::new(db_pool.clone()));
    let menu_repo = Arc::new(MenuRepository::new(db_pool.clone()));
    let folder_repo = Arc::new(FolderRepository::new(db_pool.clone()));
    let file_repo = Arc::new(FileRepository::new(db_pool.clone()));
    let activity_repo = Arc::new(ActivityLogRepository::new(db_pool.clone()));

    // ── Auth ─────────────────────────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new());
    let password_validator = Arc::new(PasswordValidator::new(&config.auth));
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let rbac = Arc::new(RbacEnforcer::new());

    // ── Services ─────────────────────────────────────────────────
    let account_service = Arc::new(AccountService::new(
        Arc::clone(&user_repo),
        Arc::clone(&role_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
        jwt_encoder,
        config.auth.clone(),
    ));
    let listing_service = Arc::new(DocumentListingService::new(
        Arc::clone(&menu_repo),
        Arc::clone(&folder_repo),
        Arc::clone(&file_repo),
        Arc::clone(&rbac),
    ));
    let mutation_service = Arc::new(DocumentMutationService::new(
        db_pool.clone(),
        Arc::clone(&menu_repo),
        Arc::clone(&folder_repo),
        Arc::clone(&file_repo),
        Arc::clone(&activity_repo),
        Arc::clone(&storage),
        Arc::clone(&rbac),
        config.storage.clone(),
    ));
    let cascade = Arc::new(UserCascade::new(
        db_pool.clone(),
        Arc::clone(&user_repo),
        Arc::clone(&folder_repo),
        Arc::clone(&file_repo),
        Arc::clone(&activity_repo),
        Arc::clone(&storage),
    ));
    let user_service = Arc::new(UserManagementService::new(
        Arc::clone(&user_repo),
        role_repo,
        cascade,
        password_hasher,
        password_validator,
        Arc::clone(&rbac),
    ));
    let activity_service = Arc::new(ActivityLogService::new(activity_repo, rbac));

    AppState {
        config: Arc::new(config),
        db_pool,
        storage_manager: storage,
        jwt_decoder,
        account_service,
        listing_service,
        mutation_service,
        user_service,
        activity_service,
    }
}

/// Runs migrations when configured, builds the app, and serves it until
/// Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    tracing::info!("Starting DocPortal v{}", env!("CARGO_PKG_VERSION"));

    if config.database.run_migrations {
        tracing::info!("Running database migrations...");
        run_migrations(&db_pool).await?;
    }

    let storage = Arc::new(StorageManager::from_config(&config.storage).await?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = build_app(build_state(config, db_pool, storage));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("DocPortal server listening on {}", addr);

    let (signal_tx, mut signal_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signal_tx.send(true);
        })
        .into_future();

    // In-flight requests get `grace` to finish once the signal arrives.
    let drain_deadline = async move {
        if signal_rx.changed().await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        () = drain_deadline => {
            tracing::warn!(
                grace_seconds = grace.as_secs(),
                "Graceful shutdown timed out, dropping open connections"
            );
        }
    }

    tracing::info!("DocPortal server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
