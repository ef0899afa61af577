//! Accounts and admin user management.

pub mod account;
pub mod admin;
pub mod cascade;
pub mod validation;

pub use account::{AccountService, LoginRequest, LoginResult, RegisterRequest};
pub use admin::{CreateUserRequest, UpdateUserRequest, UserListing, UserManagementService};
pub use cascade::{CascadeSummary, UserCascade};
