//! Admin view of the upload/download activity log.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docportal_auth::rbac::{Capability, RbacEnforcer};
use docportal_core::error::AppError;
use docportal_core::types::pagination::{PageRequest, PageResponse};
use docportal_core::types::query::empty_as_none;
use docportal_database::repositories::ActivityLogRepository;
use docportal_entity::activity::{ActivityAction, ActivityLogView};

use crate::context::RequestContext;

/// Filters for the activity log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityQuery {
    /// 1-based page number.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    /// `upload` or `download`.
    pub action: Option<String>,
    /// Only entries of this user.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<Uuid>,
}

/// Lists activity log entries.
#[derive(Debug, Clone)]
pub struct ActivityLogService {
    /// Activity log repository.
    activity_repo: Arc<ActivityLogRepository>,
    /// Capability policy.
    rbac: Arc<RbacEnforcer>,
}

impl ActivityLogService {
    /// Creates a new activity log service.
    pub fn new(activity_repo: Arc<ActivityLogRepository>, rbac: Arc<RbacEnforcer>) -> Self {
        Self {
            activity_repo,
            rbac,
        }
    }

    /// Newest-first page of entries.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: ActivityQuery,
    ) -> Result<PageResponse<ActivityLogView>, AppError> {
        self.rbac.require(&ctx.actor(), Capability::ViewActivity)?;

        let action = match query.action.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse::<ActivityAction>()?),
        };
        let page = PageRequest::page(query.page.unwrap_or(1).max(1) as u64);

        self.activity_repo.search(action, query.user_id, &page).await
    }
}
