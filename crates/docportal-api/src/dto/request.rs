//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use docportal_core::error::AppError;
use docportal_core::types::query::empty_as_none;
use docportal_service::user::{
    CreateUserRequest as SvcCreateUser, LoginRequest as SvcLogin, RegisterRequest as SvcRegister,
    UpdateUserRequest as SvcUpdateUser,
};

/// Run derived validation and turn the first failure into a validation error.
pub fn validate<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate().map_err(|errors| AppError::validation(first_message(&errors)))
}

fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("The {field} field is invalid."),
            })
        })
        .unwrap_or_else(|| "The given data was invalid.".to_string())
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
    /// Repeated password.
    #[serde(default)]
    pub password_confirmation: String,
}

impl From<RegisterRequest> for SvcRegister {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            password_confirmation: req.password_confirmation,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "The email field is required."))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

impl From<LoginRequest> for SvcLogin {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}

/// Create-folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "The folder name field is required."))]
    pub folder_name: String,
    /// Parent folder; menu root when absent.
    pub parent_id: Option<Uuid>,
}

/// Rename request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
}

/// Create user request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
    /// Repeated password.
    #[serde(default)]
    pub password_confirmation: String,
    /// Role to assign.
    pub role_id: Uuid,
}

impl From<CreateUserRequest> for SvcCreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            password_confirmation: req.password_confirmation,
            role_id: req.role_id,
        }
    }
}

/// Update user request (admin). Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name.
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: Option<String>,
    /// New email address.
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: Option<String>,
    /// New role.
    pub role_id: Option<Uuid>,
    /// New password; empty or absent keeps the current one.
    pub password: Option<String>,
    /// Repeated new password.
    pub password_confirmation: Option<String>,
}

impl From<UpdateUserRequest> for SvcUpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            role_id: req.role_id,
            password: req.password,
            password_confirmation: req.password_confirmation,
        }
    }
}

/// Bulk delete request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkDeleteRequest {
    /// Users to delete.
    #[validate(length(min = 1, message = "The user ids field is required."))]
    pub user_ids: Vec<Uuid>,
}

/// Page selection for admin lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    /// 1-based page number.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
}

impl PageParams {
    /// The requested page, clamped to at least 1.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1) as u64
    }
}
