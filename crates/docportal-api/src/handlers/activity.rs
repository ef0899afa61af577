//! Activity log handler.

use axum::Json;
use axum::extract::{Query, State};

use docportal_core::types::pagination::PageResponse;
use docportal_entity::activity::ActivityLogView;
use docportal_service::activity::ActivityQuery;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /activity-logs?page=&action=&user_id=
pub async fn list_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ApiResponse<PageResponse<ActivityLogView>>>, ApiError> {
    let page = state.activity_service.list(&auth, query).await?;
    Ok(Json(ApiResponse::ok(page)))
}
