//! Host update listing and the descriptors written into it

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::theme::enumerator::{ThemeEnumerator, ThemeError};
use crate::theme::types::InstalledTheme;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Failed to read listing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse listing {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Theme(#[from] ThemeError),
}

/// Update state shared with the host, keyed by theme slug
///
/// Serialized field names follow the host's theme update record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateListing {
    /// Unix timestamp of the host's last check, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<i64>,
    /// Installed version per slug; populated by the host when a check was requested
    #[serde(default)]
    pub checked: IndexMap<String, String>,
    /// Available updates per slug
    #[serde(default)]
    pub response: IndexMap<String, UpdateDescriptor>,
}

impl UpdateListing {
    /// Fresh listing requesting a check for every installed theme
    pub fn for_installed(installed: &[InstalledTheme]) -> Self {
        Self {
            last_checked: Some(chrono::Utc::now().timestamp()),
            checked: installed
                .iter()
                .map(|theme| (theme.slug.clone(), theme.version.clone()))
                .collect(),
            response: IndexMap::new(),
        }
    }

    /// Read the listing at `path`, or start a fresh one from the enumerated themes
    pub fn load_or_init(
        path: &Path,
        enumerator: &dyn ThemeEnumerator,
    ) -> Result<Self, ListingError> {
        if !path.exists() {
            debug!("No listing at {:?}, starting a fresh one", path);
            return Ok(Self::for_installed(&enumerator.installed_themes()?));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ListingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ListingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether the host asked for a check this cycle
    pub fn is_check_requested(&self) -> bool {
        !self.checked.is_empty()
    }

    pub fn descriptor(&self, slug: &str) -> Option<&UpdateDescriptor> {
        self.response.get(slug)
    }

    /// Insert or overwrite the descriptor for its slug
    pub fn upsert(&mut self, descriptor: UpdateDescriptor) {
        self.response.insert(descriptor.slug.clone(), descriptor);
    }

    /// Remove the descriptor for `slug`, keeping the order of the others
    pub fn remove(&mut self, slug: &str) -> Option<UpdateDescriptor> {
        self.response.shift_remove(slug)
    }
}

/// Available update for one installed theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    #[serde(rename = "theme")]
    pub slug: String,
    pub new_version: String,
    /// Page describing the new version
    #[serde(rename = "url")]
    pub info_uri: String,
    #[serde(rename = "package")]
    pub package_uri: Option<String>,
    pub author: String,
    #[serde(rename = "Tag")]
    pub tags: Vec<String>,
    pub fields: DescriptorFields,
}

/// Display bundle shown by the host's update details view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorFields {
    pub version: String,
    pub author: String,
    pub description: String,
    pub download_link: Option<String>,
    pub name: String,
    pub slug: String,
    pub tags: Vec<String>,
    pub last_updated: Option<String>,
    pub homepage: String,
}
