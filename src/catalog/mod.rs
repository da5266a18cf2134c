//! Remote theme catalog access
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Provider   │────▶│    Cache    │     │   Channel   │
//! │ (get/store) │     │ (transient) │     │ (selector)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       ▲
//!        ▼                                       │
//! ┌─────────────┐                                │
//! │     Api     │────────────────────────────────┘
//! │   (fetch)   │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: HTTP client for the theme version call and payload normalization
//! - [`cache`]: SQLite-backed transient store with per-key expiry
//! - [`channel`]: Release channel selection
//! - [`error`]: Error types for cache and API operations
//! - [`provider`]: Cache-first catalog access
//! - [`types`]: `Catalog`, `CatalogEntry` and `ThemeId`

pub mod api;
pub mod cache;
pub mod channel;
pub mod error;
pub mod provider;
pub mod types;
