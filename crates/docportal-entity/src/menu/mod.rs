//! Menu (document category) entities.

pub mod model;

pub use model::{Menu, MenuSlug};
