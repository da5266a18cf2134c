//! Catalog test utilities

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use theme_update_checker::catalog::api::HttpCatalogApi;
use theme_update_checker::catalog::cache::Cache;
use theme_update_checker::catalog::channel::{ConfiguredChannel, ReleaseChannel};
use theme_update_checker::catalog::provider::CatalogProvider;

/// Path the mock catalog API is served under
pub const THEME_DATA_PATH: &str = "/api/open/get-theme-data";

/// Create an empty transient store in a temporary directory
pub fn create_test_cache() -> (TempDir, Arc<Cache>) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let cache = Cache::new(&db_path).unwrap();
    (temp_dir, Arc::new(cache))
}

/// Create a provider calling the mock server on the stable channel
pub fn create_provider(cache: Arc<Cache>, server_url: &str) -> CatalogProvider<Cache> {
    let api = HttpCatalogApi::new(&format!("{}{}", server_url, THEME_DATA_PATH)).unwrap();

    CatalogProvider::new(
        cache,
        Arc::new(api),
        Arc::new(ConfiguredChannel::new(ReleaseChannel::Stable)),
    )
}

/// API response body for `(id, version, package)` entries
pub fn catalog_body(entries: &[(&str, &str, Option<&str>)]) -> String {
    let versions: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(id, version, package)| {
            (
                id.to_string(),
                json!({"version": version, "package": package, "updated": "2024-01-01"}),
            )
        })
        .collect();

    json!({"result": {"data": {"theme_versions": versions}}}).to_string()
}
