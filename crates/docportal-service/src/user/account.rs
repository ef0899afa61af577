//! Self-registration, login, and current-user lookup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use docportal_auth::jwt::{Claims, JwtEncoder};
use docportal_auth::password::{PasswordHasher, PasswordValidator};
use docportal_core::config::AuthConfig;
use docportal_core::error::AppError;
use docportal_database::repositories::{RoleRepository, UserRepository};
use docportal_entity::user::{CreateUser, User, UserRole, UserWithRole};

use super::validation::{normalize_email, normalize_name};
use crate::context::RequestContext;

/// Request to register an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address, used as login.
    pub email: String,
    /// Password.
    pub password: String,
    /// Repeated password.
    pub password_confirmation: String,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// A successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    /// Bearer access token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The logged-in user.
    pub user: UserWithRole,
}

/// Account lifecycle operations that act on the caller's own account.
#[derive(Debug, Clone)]
pub struct AccountService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Role repository.
    role_repo: Arc<RoleRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
    /// Auth configuration.
    config: AuthConfig,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        role_repo: Arc<RoleRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        config: AuthConfig,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            hasher,
            validator,
            encoder,
            config,
        }
    }

    /// Registers an unverified account with the configured registration role.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AppError> {
        let role = self.config.registration_role.clone();
        let user = self.provision(req, &role, false).await?;
        info!(user_id = %user.id, role = %role, "Account registered, pending verification");
        Ok(user)
    }

    /// Creates an account with the named role, verified or not.
    ///
    /// Used by registration and by operator tooling.
    pub async fn provision(
        &self,
        req: RegisterRequest,
        role_name: &str,
        verified: bool,
    ) -> Result<User, AppError> {
        let name = normalize_name(&req.name)?;
        let email = normalize_email(&req.email)?;
        if self.user_repo.email_exists(&email, None).await? {
            return Err(AppError::validation("The email has already been taken."));
        }
        self.validator
            .validate(&req.password, &req.password_confirmation)?;

        let role = self
            .role_repo
            .find_by_name(role_name)
            .await?
            .ok_or_else(|| {
                AppError::business_rule(format!("The '{role_name}' role is not configured."))
            })?;

        let password_hash = self.hasher.hash_password(&req.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                name,
                email,
                password_hash,
                role_id: role.id,
            })
            .await?;

        if !verified {
            return Ok(user);
        }
        self.user_repo
            .verify(user.id)
            .await?
            .ok_or_else(|| AppError::internal("Created user vanished before verification"))
    }

    /// Checks credentials and issues an access token.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResult, AppError> {
        let email = req.email.trim().to_lowercase();

        let Some(account) = self.user_repo.find_by_email(&email).await? else {
            self.hasher.burn_verification(&req.password);
            warn!("Login failed: unknown email");
            return Err(AppError::authentication("Invalid credentials"));
        };

        if !self
            .hasher
            .verify_password(&req.password, &account.user.password_hash)?
        {
            warn!(user_id = %account.user.id, "Login failed: wrong password");
            return Err(AppError::authentication("Invalid credentials"));
        }

        if !account.user.is_verified() {
            return Err(AppError::authorization("Account is pending verification"));
        }

        let role = account.role_name.parse().unwrap_or(UserRole::User);
        let issued = self.encoder.issue_access_token(account.user.id, role)?;

        info!(user_id = %account.user.id, role = %role, "User logged in");
        Ok(LoginResult {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
            user: account,
        })
    }

    /// Builds the request context for a validated token.
    ///
    /// The user row is re-read so deletions and role changes apply to
    /// tokens issued before them.
    pub async fn authenticate(&self, claims: &Claims) -> Result<RequestContext, AppError> {
        let user = self
            .user_repo
            .find_with_role(claims.user_id())
            .await?
            .ok_or_else(|| AppError::authentication("User no longer exists"))?;
        Ok(RequestContext::for_user(&user))
    }

    /// The caller's own account.
    pub async fn me(&self, ctx: &RequestContext) -> Result<UserWithRole, AppError> {
        self.user_repo
            .find_with_role(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
