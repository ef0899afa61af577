//! # docportal-storage
//!
//! Blob storage for uploaded documents: the local filesystem provider and
//! the [`StorageManager`] façade used by services.

pub mod manager;
pub mod providers;

pub use manager::StorageManager;
