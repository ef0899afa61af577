//! # docportal-database
//!
//! PostgreSQL connection management, embedded migrations, transaction
//! helpers, and concrete repository implementations for all DocPortal
//! entities.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod transaction;

pub use connection::DatabasePool;
pub use transaction::{Tx, begin, commit};
