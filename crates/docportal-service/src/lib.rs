//! # docportal-service
//!
//! Business logic service layer for DocPortal. Each service orchestrates
//! repositories, blob storage, and the authorization policy to implement
//! one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references, and every call receives an
//! explicit [`RequestContext`] naming the acting user.

pub mod activity;
pub mod context;
pub mod document;
pub mod user;

pub use activity::ActivityLogService;
pub use context::RequestContext;
pub use document::{DocumentListingService, DocumentMutationService};
pub use user::{AccountService, UserCascade, UserManagementService};
