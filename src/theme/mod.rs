//! Installed themes and their catalog ids
//!
//! - [`enumerator`]: Sources of the installed theme list
//! - [`id`]: Theme id extraction from tags and slug
//! - [`types`]: `InstalledTheme`

pub mod enumerator;
pub mod id;
pub mod types;
