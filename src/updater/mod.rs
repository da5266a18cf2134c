//! Update detection
//!
//! # Modules
//!
//! - [`listing`]: The host's update listing and its descriptors
//! - [`resolver`]: Catalog/installed-theme reconciliation
//! - [`scheduler`]: Trigger gating, environment setup and timeout around a check

pub mod listing;
pub mod resolver;
pub mod scheduler;
