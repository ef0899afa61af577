//! # docportal-entity
//!
//! Domain entity models for DocPortal. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod activity;
pub mod file;
pub mod folder;
pub mod menu;
pub mod user;
