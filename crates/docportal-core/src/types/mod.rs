//! Core type definitions used across the DocPortal workspace.

pub mod pagination;
pub mod query;
pub mod response;
pub mod size;

pub use pagination::{PageRequest, PageResponse};
pub use response::ApiErrorResponse;
pub use size::format_size;
