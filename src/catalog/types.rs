//! Catalog types shared by the provider and the resolver

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifier linking an installed theme to its catalog entry
///
/// Either a numeric token (`"7"`), the literal `"parent"`, or a vendor-prefixed slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeId(String);

impl ThemeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ThemeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ThemeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Latest known release of one theme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub version: Option<String>,
    /// Download location of the new version
    #[serde(rename = "package")]
    pub package_uri: Option<String>,
    /// Last-modified marker, passed through as-is
    #[serde(rename = "updated")]
    pub updated_at: Option<String>,
}

impl CatalogEntry {
    /// Version offered by the catalog; `""` and `"0"` mean no version
    pub fn incoming_version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty() && *v != "0")
    }
}

/// Snapshot of the remote catalog keyed by theme id
///
/// An empty catalog means no update information is available this cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: IndexMap<ThemeId, CatalogEntry>,
}

impl Catalog {
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(ThemeId, CatalogEntry)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (ThemeId, CatalogEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
