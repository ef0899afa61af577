//! User and role domain entities.

pub mod model;
pub mod role;

pub use model::{CreateUser, UpdateUser, User, UserWithRole};
pub use role::{Role, UserRole};
