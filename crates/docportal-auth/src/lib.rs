//! # docportal-auth
//!
//! Authentication and authorization building blocks for DocPortal.
//!
//! ## Modules
//!
//! - `jwt` — access token issuance and validation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `rbac` — the capability policy deciding who may do what

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{Actor, Capability, Decision, RbacEnforcer};
