//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{CreateFolder, Folder, FolderWithCreator};
pub use tree::{Breadcrumb, FolderLink, FolderTree};
