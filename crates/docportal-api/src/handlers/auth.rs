//! Registration, login, and current-user handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use docportal_entity::user::{User, UserWithRole};
use docportal_service::user::LoginResult;

use crate::dto::request::{LoginRequest, RegisterRequest, validate};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    validate(&req)?;
    let user = state.account_service.register(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            user,
            "Registration successful. Your account is pending verification.",
        )),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    validate(&req)?;
    let result = state.account_service.login(req.into()).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserWithRole>>, ApiError> {
    let user = state.account_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}
