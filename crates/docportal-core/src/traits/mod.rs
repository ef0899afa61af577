//! Core traits defined in `docportal-core` and implemented by other crates.

pub mod storage;

pub use storage::{ByteStream, StorageProvider};
