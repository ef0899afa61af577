//! Route handlers organized by domain.

pub mod activity;
pub mod auth;
pub mod documents;
pub mod health;
pub mod users;
