//! Installed theme enumeration

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

#[cfg(test)]
use mockall::automock;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::theme::types::InstalledTheme;

/// Only the beginning of a stylesheet is scanned for header fields
const HEADER_SCAN_BYTES: usize = 8 * 1024;

static HEADER_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t/*#@]*(Theme Name|Theme URI|Author|Description|Version|Tags):(.*)$",
    )
    .unwrap()
});

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Failed to read themes directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of the installed theme list
#[cfg_attr(test, automock)]
pub trait ThemeEnumerator: Send + Sync {
    fn installed_themes(&self) -> Result<Vec<InstalledTheme>, ThemeError>;
}

/// Fixed theme list supplied by the host
#[derive(Debug, Clone, Default)]
pub struct StaticThemeEnumerator {
    themes: Vec<InstalledTheme>,
}

impl StaticThemeEnumerator {
    pub fn new(themes: Vec<InstalledTheme>) -> Self {
        Self { themes }
    }
}

impl ThemeEnumerator for StaticThemeEnumerator {
    fn installed_themes(&self) -> Result<Vec<InstalledTheme>, ThemeError> {
        Ok(self.themes.clone())
    }
}

/// Reads themes from `<themes_dir>/<folder>/style.css` headers, keyed by folder name
pub struct DirectoryThemeEnumerator {
    themes_dir: PathBuf,
}

impl DirectoryThemeEnumerator {
    pub fn new(themes_dir: &Path) -> Self {
        Self {
            themes_dir: themes_dir.to_path_buf(),
        }
    }

    fn read_theme(dir: &Path) -> Option<InstalledTheme> {
        let folder = dir.file_name()?.to_string_lossy().into_owned();
        let stylesheet = dir.join("style.css");

        let content = std::fs::read(&stylesheet)
            .inspect_err(|e| debug!("Skipping {:?}: {}", stylesheet, e))
            .ok()?;
        let content = String::from_utf8_lossy(&content[..content.len().min(HEADER_SCAN_BYTES)]);

        let headers = parse_stylesheet_header(&content);
        let Some(name) = headers.get("Theme Name").cloned() else {
            debug!("Skipping {:?}: no Theme Name header", stylesheet);
            return None;
        };

        let field = |key: &str| headers.get(key).cloned().unwrap_or_default();

        // Folder names are unique per installation; a child theme's `Template`
        // header would collide with its parent's slug.
        Some(InstalledTheme {
            slug: folder,
            declared_tags: split_tags(&field("Tags")),
            version: field("Version"),
            name,
            author: field("Author"),
            description: field("Description"),
            homepage_uri: field("Theme URI"),
        })
    }
}

impl ThemeEnumerator for DirectoryThemeEnumerator {
    fn installed_themes(&self) -> Result<Vec<InstalledTheme>, ThemeError> {
        let entries = std::fs::read_dir(&self.themes_dir).map_err(|source| ThemeError::Io {
            path: self.themes_dir.clone(),
            source,
        })?;

        let mut themes: Vec<InstalledTheme> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| Self::read_theme(&path))
            .collect();

        themes.sort_by(|a, b| a.slug.cmp(&b.slug));
        debug!(
            "Found {} installed themes in {:?}",
            themes.len(),
            self.themes_dir
        );

        Ok(themes)
    }
}

/// Parse the comment header of a theme stylesheet
///
/// The first occurrence of each field wins.
pub fn parse_stylesheet_header(content: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for caps in HEADER_FIELD.captures_iter(content) {
        let value = caps[2].trim();
        let value = value.strip_suffix("*/").unwrap_or(value).trim();
        headers
            .entry(caps[1].to_string())
            .or_insert_with(|| value.to_string());
    }

    headers
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
