//! Reconciles installed themes against the catalog

use tracing::{debug, info};

use crate::catalog::cache::TransientStore;
use crate::catalog::provider::CatalogProvider;
use crate::catalog::types::{Catalog, CatalogEntry};
use crate::theme::id::extract_theme_id;
use crate::theme::types::InstalledTheme;
use crate::updater::listing::{DescriptorFields, UpdateDescriptor, UpdateListing};

/// Prefix of the info page used when a theme declares no homepage
pub const THEME_INFO_URI_BASE: &str = "//www.boldgrid.com/themes/";

/// Homepage shown in every descriptor's display bundle
pub const VENDOR_HOMEPAGE: &str = "http://www.boldgrid.com/";

/// Adds and removes update descriptors based on the current catalog
pub struct UpdateResolver<S: TransientStore> {
    provider: CatalogProvider<S>,
}

impl<S: TransientStore> UpdateResolver<S> {
    pub fn new(provider: CatalogProvider<S>) -> Self {
        Self { provider }
    }

    /// Update `listing` for the installed themes and return it
    ///
    /// The listing comes back unchanged when no check was requested or no
    /// catalog is available.
    pub async fn resolve(
        &self,
        mut listing: UpdateListing,
        installed: &[InstalledTheme],
    ) -> UpdateListing {
        if !listing.is_check_requested() {
            debug!("No check requested, leaving listing unchanged");
            return listing;
        }

        let catalog = self.provider.get_catalog().await;
        if catalog.is_empty() {
            debug!("No catalog available, leaving listing unchanged");
            return listing;
        }

        apply_catalog(&catalog, &mut listing, installed);
        listing
    }
}

/// Apply one catalog snapshot to the listing
///
/// Afterwards every managed theme has a descriptor exactly when the catalog
/// offers a version different from the installed one. Unmanaged themes are
/// left alone.
pub fn apply_catalog(catalog: &Catalog, listing: &mut UpdateListing, installed: &[InstalledTheme]) {
    for theme in installed {
        let Some(theme_id) = extract_theme_id(&theme.declared_tags, &theme.slug) else {
            continue;
        };

        let entry = catalog.get(theme_id.as_str());
        let incoming = entry.and_then(CatalogEntry::incoming_version);

        // Plain inequality: any differing catalog version counts as an update.
        match (entry, incoming) {
            (Some(entry), Some(incoming)) if incoming != theme.version => {
                info!(
                    "Update available for {} (id {}): {} -> {}",
                    theme.slug, theme_id, theme.version, incoming
                );
                listing.upsert(build_descriptor(theme, entry, incoming));
            }
            _ => {
                if listing.remove(&theme.slug).is_some() {
                    debug!("Removed stale update entry for {}", theme.slug);
                }
            }
        }
    }
}

/// Info page for a theme: its declared homepage, or the vendor page named after it
pub fn info_uri(theme: &InstalledTheme) -> String {
    if theme.homepage_uri.is_empty() {
        format!("{}{}", THEME_INFO_URI_BASE, theme.name.to_lowercase())
    } else {
        theme.homepage_uri.clone()
    }
}

fn build_descriptor(
    theme: &InstalledTheme,
    entry: &CatalogEntry,
    incoming: &str,
) -> UpdateDescriptor {
    UpdateDescriptor {
        slug: theme.slug.clone(),
        new_version: incoming.to_string(),
        info_uri: info_uri(theme),
        package_uri: entry.package_uri.clone(),
        author: theme.author.clone(),
        tags: theme.declared_tags.clone(),
        fields: DescriptorFields {
            version: incoming.to_string(),
            author: theme.author.clone(),
            description: theme.description.clone(),
            download_link: entry.package_uri.clone(),
            name: theme.name.clone(),
            slug: theme.slug.clone(),
            tags: theme.declared_tags.clone(),
            last_updated: entry.updated_at.clone(),
            homepage: VENDOR_HOMEPAGE.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalog::api::MockCatalogApi;
    use crate::catalog::cache::MockTransientStore;
    use crate::catalog::channel::{ConfiguredChannel, ReleaseChannel};
    use crate::catalog::error::ApiError;
    use crate::catalog::types::ThemeId;
    use rstest::rstest;

    fn catalog_with(id: &str, version: &str) -> Catalog {
        [(
            ThemeId::from(id),
            CatalogEntry {
                version: Some(version.to_string()),
                package_uri: Some("http://x/pkg.zip".to_string()),
                updated_at: Some("2024-01-01".to_string()),
            },
        )]
        .into_iter()
        .collect()
    }

    fn sample_theme(version: &str) -> InstalledTheme {
        InstalledTheme {
            slug: "boldgrid-sample".to_string(),
            declared_tags: vec!["boldgrid-theme-7".to_string()],
            version: version.to_string(),
            name: "Sample".to_string(),
            author: "BoldGrid".to_string(),
            description: "A sample theme.".to_string(),
            homepage_uri: String::new(),
        }
    }

    fn checked_listing() -> UpdateListing {
        let mut listing = UpdateListing::default();
        listing
            .checked
            .insert("boldgrid-sample".to_string(), "1.5".to_string());
        listing
    }

    fn resolver_with_api(api: MockCatalogApi) -> UpdateResolver<MockTransientStore> {
        let mut store = MockTransientStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_set().returning(|_, _, _| Ok(()));

        UpdateResolver::new(CatalogProvider::new(
            Arc::new(store),
            Arc::new(api),
            Arc::new(ConfiguredChannel::new(ReleaseChannel::Stable)),
        ))
    }

    #[test]
    fn apply_catalog_adds_descriptor_for_newer_version() {
        let mut listing = checked_listing();

        apply_catalog(&catalog_with("7", "2.0"), &mut listing, &[sample_theme("1.5")]);

        assert_eq!(
            listing.descriptor("boldgrid-sample"),
            Some(&UpdateDescriptor {
                slug: "boldgrid-sample".to_string(),
                new_version: "2.0".to_string(),
                info_uri: "//www.boldgrid.com/themes/sample".to_string(),
                package_uri: Some("http://x/pkg.zip".to_string()),
                author: "BoldGrid".to_string(),
                tags: vec!["boldgrid-theme-7".to_string()],
                fields: DescriptorFields {
                    version: "2.0".to_string(),
                    author: "BoldGrid".to_string(),
                    description: "A sample theme.".to_string(),
                    download_link: Some("http://x/pkg.zip".to_string()),
                    name: "Sample".to_string(),
                    slug: "boldgrid-sample".to_string(),
                    tags: vec!["boldgrid-theme-7".to_string()],
                    last_updated: Some("2024-01-01".to_string()),
                    homepage: VENDOR_HOMEPAGE.to_string(),
                },
            })
        );
    }

    #[test]
    fn apply_catalog_removes_stale_descriptor_when_up_to_date() {
        let mut listing = checked_listing();
        apply_catalog(&catalog_with("7", "2.0"), &mut listing, &[sample_theme("1.5")]);
        assert!(listing.descriptor("boldgrid-sample").is_some());

        apply_catalog(&catalog_with("7", "2.0"), &mut listing, &[sample_theme("2.0")]);

        assert!(listing.descriptor("boldgrid-sample").is_none());
    }

    #[test]
    fn apply_catalog_removes_descriptor_when_catalog_has_no_entry() {
        let mut listing = checked_listing();
        apply_catalog(&catalog_with("7", "2.0"), &mut listing, &[sample_theme("1.5")]);

        apply_catalog(&catalog_with("8", "9.9"), &mut listing, &[sample_theme("1.5")]);

        assert!(listing.response.is_empty());
    }

    #[test]
    fn apply_catalog_treats_empty_catalog_version_as_no_update() {
        let mut listing = checked_listing();

        apply_catalog(&catalog_with("7", ""), &mut listing, &[sample_theme("1.5")]);

        assert!(listing.response.is_empty());
    }

    #[test]
    fn apply_catalog_treats_zero_catalog_version_as_no_update() {
        let mut listing = checked_listing();
        apply_catalog(&catalog_with("7", "2.0"), &mut listing, &[sample_theme("1.5")]);

        apply_catalog(&catalog_with("7", "0"), &mut listing, &[sample_theme("1.5")]);

        assert!(listing.response.is_empty());
    }

    #[test]
    fn apply_catalog_keeps_parent_descriptor_next_to_child_theme() {
        let parent =
            InstalledTheme::new("boldgrid-crio", "1.5").with_tags(&["boldgrid-theme-parent"]);
        let child = InstalledTheme::new("crio-child", "0.1");
        let vendor_named_child = InstalledTheme::new("boldgrid-crio-child", "0.1");
        let mut listing = checked_listing();

        apply_catalog(
            &catalog_with("parent", "2.0"),
            &mut listing,
            &[parent, child, vendor_named_child],
        );

        assert_eq!(
            listing.descriptor("boldgrid-crio").unwrap().new_version,
            "2.0"
        );
        assert_eq!(
            listing.response.keys().collect::<Vec<_>>(),
            vec!["boldgrid-crio"]
        );
    }

    #[test]
    fn apply_catalog_flags_lower_catalog_version_as_update() {
        let mut listing = checked_listing();

        apply_catalog(&catalog_with("7", "1.0"), &mut listing, &[sample_theme("1.5")]);

        assert_eq!(
            listing.descriptor("boldgrid-sample").unwrap().new_version,
            "1.0"
        );
    }

    #[test]
    fn apply_catalog_leaves_unmanaged_theme_descriptor_untouched() {
        let mut listing = checked_listing();
        apply_catalog(&catalog_with("7", "2.0"), &mut listing, &[sample_theme("1.5")]);
        let foreign = UpdateDescriptor {
            slug: "my-theme".to_string(),
            ..listing.descriptor("boldgrid-sample").unwrap().clone()
        };
        listing.upsert(foreign.clone());

        let unmanaged = InstalledTheme::new("my-theme", "1.0").with_tags(&["blue"]);
        apply_catalog(&catalog_with("my-theme", "2.0"), &mut listing, &[unmanaged]);

        assert_eq!(listing.descriptor("my-theme"), Some(&foreign));
    }

    #[test]
    fn apply_catalog_matches_vendor_slug_without_tag() {
        let mut listing = checked_listing();
        let theme = InstalledTheme::new("boldgrid-gridone", "1.0");

        apply_catalog(&catalog_with("boldgrid-gridone", "1.1"), &mut listing, &[theme]);

        assert_eq!(
            listing.descriptor("boldgrid-gridone").unwrap().new_version,
            "1.1"
        );
    }

    #[test]
    fn apply_catalog_prefers_tag_id_over_vendor_slug() {
        let mut listing = checked_listing();
        let catalog: Catalog = [
            (
                ThemeId::from("7"),
                CatalogEntry {
                    version: Some("2.0".to_string()),
                    ..Default::default()
                },
            ),
            (
                ThemeId::from("boldgrid-sample"),
                CatalogEntry {
                    version: Some("1.5".to_string()),
                    ..Default::default()
                },
            ),
        ]
        .into_iter()
        .collect();

        apply_catalog(&catalog, &mut listing, &[sample_theme("1.5")]);

        assert_eq!(
            listing.descriptor("boldgrid-sample").unwrap().new_version,
            "2.0"
        );
    }

    #[test]
    fn apply_catalog_is_idempotent() {
        let catalog = catalog_with("7", "2.0");
        let themes = vec![
            sample_theme("1.5"),
            InstalledTheme::new("my-theme", "1.0"),
            InstalledTheme::new("boldgrid-other", "3.0"),
        ];

        let mut once = checked_listing();
        apply_catalog(&catalog, &mut once, &themes);
        let mut twice = once.clone();
        apply_catalog(&catalog, &mut twice, &themes);

        assert_eq!(once, twice);
    }

    #[rstest]
    #[case("", "Crio Pro", "//www.boldgrid.com/themes/crio pro")]
    #[case("", "GridOne", "//www.boldgrid.com/themes/gridone")]
    #[case("https://example.com/t", "GridOne", "https://example.com/t")]
    fn info_uri_falls_back_to_lowercased_name(
        #[case] homepage: &str,
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        let theme = InstalledTheme {
            homepage_uri: homepage.to_string(),
            name: name.to_string(),
            ..Default::default()
        };

        assert_eq!(info_uri(&theme), expected);
    }

    #[tokio::test]
    async fn resolve_returns_listing_unchanged_without_checked_marker() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_theme_versions().times(0);
        let resolver = resolver_with_api(api);

        let listing = resolver
            .resolve(UpdateListing::default(), &[sample_theme("1.5")])
            .await;

        assert_eq!(listing, UpdateListing::default());
    }

    #[tokio::test]
    async fn resolve_adds_descriptor_from_fetched_catalog() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_theme_versions()
            .times(1)
            .returning(|_| Ok(catalog_with("7", "2.0")));
        let resolver = resolver_with_api(api);

        let listing = resolver
            .resolve(checked_listing(), &[sample_theme("1.5")])
            .await;

        let descriptor = listing.descriptor("boldgrid-sample").unwrap();
        assert_eq!(descriptor.new_version, "2.0");
        assert_eq!(descriptor.package_uri.as_deref(), Some("http://x/pkg.zip"));
    }

    #[tokio::test]
    async fn resolve_keeps_existing_descriptors_when_fetch_fails() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_theme_versions()
            .times(1)
            .returning(|_| Err(ApiError::InvalidResponse("offline".to_string())));
        let resolver = resolver_with_api(api);

        let mut listing = checked_listing();
        apply_catalog(&catalog_with("7", "2.0"), &mut listing, &[sample_theme("1.5")]);
        let before = listing.clone();

        // Installed version now matches, but without a catalog nothing may change.
        let after = resolver.resolve(listing, &[sample_theme("2.0")]).await;

        assert_eq!(after, before);
    }
}
