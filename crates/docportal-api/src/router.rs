//! Route definitions for the DocPortal HTTP API.
//!
//! Routes are grouped by domain. The router receives `AppState` and passes
//! it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route, without middleware.
///
/// Layers are added by [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(document_routes())
        .merge(user_routes())
        .merge(activity_routes())
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

fn document_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/system-owner/download/{id}",
            get(handlers::documents::download),
        )
        .route(
            "/system-owner/{menu}",
            get(handlers::documents::list_documents),
        )
        .route(
            "/system-owner/{menu}/upload",
            post(handlers::documents::upload),
        )
        .route(
            "/system-owner/{menu}/create-folder",
            post(handlers::documents::create_folder),
        )
        .route(
            "/system-owner/{menu}/{id}/{type}/update",
            patch(handlers::documents::rename),
        )
        .route(
            "/system-owner/{menu}/{id}/{type}",
            delete(handlers::documents::delete),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/manage-user",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/manage-user/bulk-delete",
            post(handlers::users::bulk_delete),
        )
        .route(
            "/manage-user/{id}",
            put(handlers::users::update_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/manage-user/{id}/verify",
            post(handlers::users::verify_user),
        )
}

fn activity_routes() -> Router<AppState> {
    Router::new().route("/activity-logs", get(handlers::activity::list_activity))
}
