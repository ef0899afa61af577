//! Activity log browsing.

pub mod service;

pub use service::{ActivityLogService, ActivityQuery};
