//! Theme id extraction

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::types::ThemeId;

/// Reserved tag namespace marking a managed theme: `boldgrid-theme-<number>` or `boldgrid-theme-parent`
static THEME_ID_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^boldgrid-theme-([0-9]+|parent)$").unwrap());

/// Slug substring identifying self-identifying vendor packages
const VENDOR_SLUG_PREFIX: &str = "boldgrid-";

/// Derive the catalog id of a theme
///
/// The first tag in the reserved namespace wins. Otherwise a slug containing
/// the vendor prefix is its own id. Anything else is not managed here.
pub fn extract_theme_id<S: AsRef<str>>(tags: &[S], slug: &str) -> Option<ThemeId> {
    tags.iter()
        .find_map(|tag| {
            THEME_ID_TAG
                .captures(tag.as_ref())
                .and_then(|caps| caps.get(1))
                .map(|token| ThemeId::new(token.as_str()))
        })
        .or_else(|| slug.contains(VENDOR_SLUG_PREFIX).then(|| ThemeId::new(slug)))
}
