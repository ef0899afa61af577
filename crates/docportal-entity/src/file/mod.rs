//! File domain entities.

pub mod kind;
pub mod model;

pub use kind::{ALLOWED_EXTENSIONS, EntryType, extension_of, is_allowed_extension, mime_type_for};
pub use model::{CreateFile, File, FileWithUploader};
