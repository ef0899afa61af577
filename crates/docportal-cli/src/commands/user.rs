//! User management CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use docportal_auth::jwt::JwtEncoder;
use docportal_auth::password::{PasswordHasher, PasswordValidator};
use docportal_core::config::AppConfig;
use docportal_core::error::AppError;
use docportal_database::repositories::{RoleRepository, UserRepository};
use docportal_entity::user::UserWithRole;
use docportal_service::user::{AccountService, RegisterRequest};

/// Role assigned by `create-admin`.
const ADMIN_ROLE: &str = "admin";

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Create a verified administrator, prompting for the password
    CreateAdmin {
        /// Display name
        #[arg(long)]
        name: String,
        /// Login email
        #[arg(long)]
        email: String,
    },
    /// Mark a pending account as verified
    Verify {
        /// Login email
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Name
    name: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Verification state
    verified: String,
    /// Created at
    created_at: String,
}

impl From<&UserWithRole> for UserRow {
    fn from(u: &UserWithRole) -> Self {
        Self {
            id: u.user.id.to_string(),
            name: u.user.name.clone(),
            email: u.user.email.clone(),
            role: u.role_name.clone(),
            verified: match u.user.email_verified_at {
                Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
                None => "pending".to_string(),
            },
            created_at: u.user.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let user_repo = Arc::new(UserRepository::new(pool.clone()));

    match &args.command {
        UserCommand::List => {
            let users = user_repo.find_all().await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::CreateAdmin { name, email } => {
            let password = dialoguer::Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

            let accounts = AccountService::new(
                Arc::clone(&user_repo),
                Arc::new(RoleRepository::new(pool)),
                Arc::new(PasswordHasher::new()),
                Arc::new(PasswordValidator::new(&config.auth)),
                Arc::new(JwtEncoder::new(&config.auth)),
                config.auth.clone(),
            );

            let user = accounts
                .provision(
                    RegisterRequest {
                        name: name.clone(),
                        email: email.clone(),
                        password_confirmation: password.clone(),
                        password,
                    },
                    ADMIN_ROLE,
                    true,
                )
                .await?;

            output::print_success(&format!("Administrator '{}' created", user.email));
            output::print_kv("id", &user.id.to_string());
            output::print_kv("role", ADMIN_ROLE);
        }
        UserCommand::Verify { email } => {
            let account = user_repo
                .find_by_email(&email.trim().to_lowercase())
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

            user_repo
                .verify(account.user.id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

            output::print_success(&format!("User '{email}' verified"));
        }
    }

    Ok(())
}
