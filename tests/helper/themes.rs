//! Installed theme test utilities

use std::path::Path;

use theme_update_checker::updater::listing::UpdateListing;

/// Write `<root>/<folder>/style.css` with the given header values
pub fn write_theme(root: &Path, folder: &str, name: &str, version: &str, tags: &[&str]) {
    let dir = root.join(folder);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("style.css"),
        format!(
            "/*\nTheme Name: {}\nAuthor: BoldGrid\nDescription: Test theme.\nVersion: {}\nTags: {}\n*/\n",
            name,
            version,
            tags.join(", ")
        ),
    )
    .unwrap();
}

/// Listing with the check marker set for the given `(slug, version)` pairs
pub fn checked_listing(themes: &[(&str, &str)]) -> UpdateListing {
    let mut listing = UpdateListing::default();
    for (slug, version) in themes {
        listing.checked.insert(slug.to_string(), version.to_string());
    }
    listing
}
