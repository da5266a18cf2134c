//! Theme update detection against a remote version catalog
//!
//! # Modules
//!
//! - [`catalog`]: Remote catalog fetching, caching and channel selection
//! - [`config`]: Configuration, constants and data paths
//! - [`theme`]: Installed themes and catalog id extraction
//! - [`updater`]: Update listing reconciliation and scheduling

pub mod catalog;
pub mod config;
pub mod theme;
pub mod updater;
