//! Admin user management: listing, CRUD, bulk delete, and verification.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use docportal_auth::password::{PasswordHasher, PasswordValidator};
use docportal_auth::rbac::{Capability, RbacEnforcer};
use docportal_core::error::AppError;
use docportal_core::types::pagination::{PageRequest, PageResponse};
use docportal_database::repositories::{RoleRepository, UserRepository};
use docportal_entity::user::{CreateUser, Role, UpdateUser, User, UserWithRole};

use super::cascade::UserCascade;
use super::validation::{normalize_email, normalize_name};
use crate::context::RequestContext;

/// Request to create a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Repeated password.
    pub password_confirmation: String,
    /// Assigned role.
    pub role_id: Uuid,
}

/// Partial update of a user. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New role.
    pub role_id: Option<Uuid>,
    /// New password; empty means unchanged.
    pub password: Option<String>,
    /// Repeated new password.
    pub password_confirmation: Option<String>,
}

/// A page of users together with the assignable roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListing {
    /// Users ordered by name.
    pub users: PageResponse<UserWithRole>,
    /// Every role.
    pub roles: Vec<Role>,
}

/// Handles administrative user management operations.
#[derive(Debug, Clone)]
pub struct UserManagementService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Role repository.
    role_repo: Arc<RoleRepository>,
    /// Cascading user removal.
    cascade: Arc<UserCascade>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Capability policy.
    rbac: Arc<RbacEnforcer>,
}

impl UserManagementService {
    /// Creates a new user management service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        role_repo: Arc<RoleRepository>,
        cascade: Arc<UserCascade>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            cascade,
            hasher,
            validator,
            rbac,
        }
    }

    /// Lists users with pagination.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<UserListing, AppError> {
        self.rbac.require(&ctx.actor(), Capability::ManageUsers)?;

        let users = self.user_repo.find_page(&page).await?;
        let roles = self.role_repo.find_all().await?;
        Ok(UserListing { users, roles })
    }

    /// Creates a new, unverified user.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        req: CreateUserRequest,
    ) -> Result<User, AppError> {
        self.rbac.require(&ctx.actor(), Capability::ManageUsers)?;

        let name = normalize_name(&req.name)?;
        let email = normalize_email(&req.email)?;
        if self.user_repo.email_exists(&email, None).await? {
            return Err(AppError::validation("The email has already been taken."));
        }
        self.validator
            .validate(&req.password, &req.password_confirmation)?;
        self.ensure_role(req.role_id).await?;

        let password_hash = self.hasher.hash_password(&req.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                name,
                email,
                password_hash,
                role_id: req.role_id,
            })
            .await?;

        info!(admin_id = %ctx.user_id, user_id = %user.id, "User created by admin");
        Ok(user)
    }

    /// Applies a partial update to a user.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<User, AppError> {
        self.rbac.require(&ctx.actor(), Capability::ManageUsers)?;

        let existing = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let mut update = UpdateUser::default();

        if let Some(name) = req.name.as_deref() {
            update.name = Some(normalize_name(name)?);
        }
        if let Some(email) = req.email.as_deref() {
            let email = normalize_email(email)?;
            if email != existing.email && self.user_repo.email_exists(&email, Some(user_id)).await?
            {
                return Err(AppError::validation("The email has already been taken."));
            }
            update.email = Some(email);
        }
        if let Some(role_id) = req.role_id {
            self.ensure_role(role_id).await?;
            update.role_id = Some(role_id);
        }
        if let Some(password) = req.password.as_deref().filter(|p| !p.is_empty()) {
            let confirmation = req.password_confirmation.as_deref().unwrap_or_default();
            self.validator.validate(password, confirmation)?;
            update.password_hash = Some(self.hasher.hash_password(password)?);
        }

        if update.is_empty() {
            return Ok(existing);
        }

        let user = self
            .user_repo
            .update(user_id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(admin_id = %ctx.user_id, user_id = %user_id, "User updated by admin");
        Ok(user)
    }

    /// Deletes a user and everything the user owns.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<(), AppError> {
        self.rbac.require(&ctx.actor(), Capability::ManageUsers)?;

        if user_id == ctx.user_id {
            warn!(user_id = %ctx.user_id, "User attempted to delete own account");
            return Err(AppError::business_rule("You cannot delete your own account."));
        }

        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.cascade.delete_users(&[user_id]).await?;

        info!(admin_id = %ctx.user_id, user_id = %user_id, "User deleted");
        Ok(())
    }

    /// Deletes several users at once. The acting user is silently skipped.
    ///
    /// Returns the number of users deleted.
    pub async fn bulk_delete(
        &self,
        ctx: &RequestContext,
        user_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        self.rbac.require(&ctx.actor(), Capability::ManageUsers)?;

        let targets = bulk_targets(user_ids, ctx.user_id);
        if targets.is_empty() {
            return Err(AppError::business_rule(
                "No valid users selected for deletion.",
            ));
        }

        let existing: HashSet<Uuid> = self
            .user_repo
            .find_existing_ids(&targets)
            .await?
            .into_iter()
            .collect();
        if let Some(missing) = targets.iter().find(|id| !existing.contains(id)) {
            return Err(AppError::validation(format!(
                "The selected user {missing} is invalid."
            )));
        }

        let summary = self.cascade.delete_users(&targets).await?;

        info!(
            admin_id = %ctx.user_id,
            count = summary.users,
            "Bulk delete completed"
        );
        Ok(summary.users)
    }

    /// Marks a user as verified. Verifying twice keeps the first timestamp.
    pub async fn verify_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<User, AppError> {
        self.rbac.require(&ctx.actor(), Capability::ManageUsers)?;

        let user = self
            .user_repo
            .verify(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(admin_id = %ctx.user_id, user_id = %user_id, "User verified");
        Ok(user)
    }

    async fn ensure_role(&self, role_id: Uuid) -> Result<Role, AppError> {
        self.role_repo
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::validation("The selected role is invalid."))
    }
}

/// De-duplicate requested ids, keeping first-seen order, and drop the actor.
pub fn bulk_targets(requested: &[Uuid], actor_id: Uuid) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .copied()
        .filter(|id| *id != actor_id && seen.insert(*id))
        .collect()
}
