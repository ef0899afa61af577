//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user of the portal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address, unique across users. Used as login.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Assigned role.
    pub role_id: Uuid,
    /// When an admin verified the account (null = unverified).
    pub email_verified_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether the account has been verified.
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

/// A user joined with the name of its role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserWithRole {
    /// The user row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    /// Name of the referenced role.
    pub role_name: String,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role_id: Uuid,
}

/// Partial update of a user. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New pre-hashed password.
    pub password_hash: Option<String>,
    /// New role.
    pub role_id: Option<Uuid>,
}

impl UpdateUser {
    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role_id.is_none()
    }
}
