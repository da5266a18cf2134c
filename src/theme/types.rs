//! Installed theme record

/// One locally installed theme, as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledTheme {
    /// Folder name of the theme
    pub slug: String,
    pub declared_tags: Vec<String>,
    pub version: String,
    pub name: String,
    pub author: String,
    pub description: String,
    pub homepage_uri: String,
}

#[cfg(test)]
impl InstalledTheme {
    pub fn new(slug: &str, version: &str) -> Self {
        Self {
            slug: slug.to_string(),
            version: version.to_string(),
            name: slug.to_string(),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.declared_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}
