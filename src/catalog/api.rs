//! Remote catalog API client

#[cfg(test)]
use mockall::automock;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::channel::ReleaseChannel;
use crate::catalog::error::ApiError;
use crate::catalog::types::{Catalog, CatalogEntry, ThemeId};

/// JSON pointer to the version table inside the API response
const THEME_VERSIONS_POINTER: &str = "/result/data/theme_versions";

/// Trait for fetching the theme version catalog from a remote source
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches the version table served for the given release channel
    ///
    /// # Returns
    /// * `Ok(Catalog)` - Normalized catalog, possibly empty
    /// * `Err(ApiError)` - Transport failure or a response without a version table
    async fn fetch_theme_versions(&self, channel: ReleaseChannel) -> Result<Catalog, ApiError>;
}

/// Catalog API over HTTP
pub struct HttpCatalogApi {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl HttpCatalogApi {
    /// Creates a client calling `url` (base URL plus theme data path)
    pub fn new(url: &str) -> Result<Self, ApiError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))?;

        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent("theme-update-checker")
                .build()?,
            url,
        })
    }
}

#[async_trait::async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_theme_versions(&self, channel: ReleaseChannel) -> Result<Catalog, ApiError> {
        debug!("Requesting theme versions from {} ({})", self.url, channel.as_str());

        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("channel", channel.as_str());

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Catalog API returned status {}: {}", status, self.url);
            return Err(ApiError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            warn!("Failed to parse catalog API response: {}", e);
            ApiError::InvalidResponse(e.to_string())
        })?;

        match body.pointer(THEME_VERSIONS_POINTER) {
            Some(versions) if !versions.is_null() => normalize_theme_versions(versions),
            _ => Err(ApiError::InvalidResponse(
                "missing result.data.theme_versions".to_string(),
            )),
        }
    }
}

/// Convert the raw version table into a keyed catalog
///
/// The table is normally an object keyed by theme id. A list is accepted too,
/// its positions becoming the ids.
pub fn normalize_theme_versions(versions: &Value) -> Result<Catalog, ApiError> {
    match versions {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(id, entry)| (ThemeId::new(id.as_str()), parse_entry(entry)))
            .collect()),
        Value::Array(list) => Ok(list
            .iter()
            .enumerate()
            .map(|(index, entry)| (ThemeId::new(index.to_string()), parse_entry(entry)))
            .collect()),
        other => Err(ApiError::InvalidResponse(format!(
            "theme_versions is not a collection: {}",
            other
        ))),
    }
}

fn parse_entry(entry: &Value) -> CatalogEntry {
    CatalogEntry {
        version: field_as_string(entry, "version"),
        package_uri: field_as_string(entry, "package"),
        updated_at: field_as_string(entry, "updated"),
    }
}

/// Read a scalar field as text; numbers are kept in their JSON form
fn field_as_string(entry: &Value, field: &str) -> Option<String> {
    match entry.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
