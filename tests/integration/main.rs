//! Integration tests for the DocPortal HTTP API.
//!
//! Tests marked `#[ignore]` need PostgreSQL: set `DOCPORTAL_TEST_DATABASE_URL`
//! and run `cargo test -- --ignored`. The rest run against a router whose
//! pool is never touched.

mod helpers;

mod activity_test;
mod auth_test;
mod document_test;
mod routing_test;
mod user_test;
