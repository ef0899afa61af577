//! Role-based authorization.

pub mod enforcer;
pub mod policies;

pub use enforcer::RbacEnforcer;
pub use policies::{Actor, Capability, Decision, evaluate};
