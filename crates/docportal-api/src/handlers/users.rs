//! Admin user management handlers under `/manage-user`.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use docportal_core::types::pagination::PageRequest;
use docportal_entity::user::User;
use docportal_service::user::UserListing;

use crate::dto::request::{
    BulkDeleteRequest, CreateUserRequest, PageParams, UpdateUserRequest, validate,
};
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_uuid};
use crate::state::AppState;

/// GET /manage-user?page=
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<UserListing>>, ApiError> {
    let listing = state
        .user_service
        .list_users(&auth, PageRequest::page(params.page()))
        .await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// POST /manage-user
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    validate(&req)?;
    let user = state.user_service.create_user(&auth, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(user, "User created successfully.")),
    ))
}

/// PUT|PATCH /manage-user/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = parse_uuid(&id)?;
    validate(&req)?;
    let user = state
        .user_service
        .update_user(&auth, id, req.into())
        .await?;
    Ok(Json(ApiResponse::with_message(user, "User updated successfully.")))
}

/// DELETE /manage-user/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    state.user_service.delete_user(&auth, id).await?;
    Ok(Json(ApiResponse::with_message(
        DeletedResponse { deleted: 1 },
        "User deleted successfully.",
    )))
}

/// POST /manage-user/{id}/verify
pub async fn verify_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = parse_uuid(&id)?;
    let user = state.user_service.verify_user(&auth, id).await?;
    Ok(Json(ApiResponse::with_message(
        user,
        "User verified successfully.",
    )))
}

/// POST /manage-user/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    validate(&req)?;
    let deleted = state.user_service.bulk_delete(&auth, &req.user_ids).await?;
    Ok(Json(ApiResponse::with_message(
        DeletedResponse { deleted },
        format!("{deleted} user(s) deleted successfully."),
    )))
}
