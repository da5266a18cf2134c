//! Shared utilities for integration tests

pub mod catalog;
pub mod themes;

pub use catalog::{catalog_body, create_provider, create_test_cache};
pub use themes::{checked_listing, write_theme};
