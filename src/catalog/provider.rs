//! Cached access to the remote catalog

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::catalog::api::CatalogApi;
use crate::catalog::cache::TransientStore;
use crate::catalog::channel::ChannelSelector;
use crate::catalog::types::Catalog;
use crate::config::{CATALOG_CACHE_KEY, CATALOG_CACHE_TTL_SECS};

/// Returns the current catalog, fetching it only when the cached copy is gone
///
/// Every failure degrades to an empty catalog. Nothing is retried here; the
/// next scheduled check is the retry.
pub struct CatalogProvider<S: TransientStore> {
    store: Arc<S>,
    api: Arc<dyn CatalogApi>,
    channel: Arc<dyn ChannelSelector>,
    ttl: Duration,
}

impl<S: TransientStore> CatalogProvider<S> {
    pub fn new(store: Arc<S>, api: Arc<dyn CatalogApi>, channel: Arc<dyn ChannelSelector>) -> Self {
        Self {
            store,
            api,
            channel,
            ttl: Duration::from_secs(CATALOG_CACHE_TTL_SECS),
        }
    }

    /// Override the cache lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn get_catalog(&self) -> Catalog {
        if let Some(catalog) = self.cached_catalog() {
            debug!("Using cached catalog with {} entries", catalog.len());
            return catalog;
        }

        let channel = self.channel.channel();
        let catalog = match self.api.fetch_theme_versions(channel).await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Failed to fetch theme catalog ({}): {}", channel.as_str(), e);
                return Catalog::default();
            }
        };

        info!(
            "Fetched catalog with {} entries ({})",
            catalog.len(),
            channel.as_str()
        );
        self.store_catalog(&catalog);

        catalog
    }

    /// Drop the cached catalog so the next call fetches fresh data
    pub fn invalidate(&self) {
        let _ = self
            .store
            .delete(CATALOG_CACHE_KEY)
            .inspect_err(|e| error!("Failed to delete cached catalog: {}", e));
    }

    fn cached_catalog(&self) -> Option<Catalog> {
        let raw = self
            .store
            .get(CATALOG_CACHE_KEY)
            .inspect_err(|e| error!("Failed to read cached catalog: {}", e))
            .ok()??;

        let catalog: Catalog = serde_json::from_str(&raw)
            .inspect_err(|e| warn!("Discarding unreadable cached catalog: {}", e))
            .ok()?;

        (!catalog.is_empty()).then_some(catalog)
    }

    fn store_catalog(&self, catalog: &Catalog) {
        let raw = match serde_json::to_string(catalog) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to serialize catalog: {}", e);
                return;
            }
        };

        let _ = self
            .store
            .set(CATALOG_CACHE_KEY, &raw, self.ttl)
            .inspect_err(|e| error!("Failed to cache catalog: {}", e));
    }
}
