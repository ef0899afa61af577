//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docportal_auth::rbac::Actor;
use docportal_entity::user::{UserRole, UserWithRole};

/// Context for the current authenticated request.
///
/// Built by the auth extractor from a freshly loaded user row and passed
/// into every service method, so each operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's current role.
    pub role: UserRole,
    /// Whether an admin has verified the account.
    pub verified: bool,
    /// Display name.
    pub name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole, verified: bool, name: String) -> Self {
        Self {
            user_id,
            role,
            verified,
            name,
            request_time: Utc::now(),
        }
    }

    /// Builds the context for a loaded user. Unknown role names get the
    /// least privileged role.
    pub fn for_user(user: &UserWithRole) -> Self {
        let role = user.role_name.parse().unwrap_or(UserRole::User);
        Self::new(user.user.id, role, user.user.is_verified(), user.user.name.clone())
    }

    /// The acting user as the authorization policy sees it.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
            verified: self.verified,
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
