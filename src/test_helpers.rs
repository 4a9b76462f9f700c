//! Shared test utilities for the lectern test suite.
//!
//! Provides fixture setup, lookup helpers, and navigation tree assertions
//! that work with the scan and resolve manifests.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let judaism = find_topic(&manifest, "judaism");
//! assert_eq!(judaism.tradition.as_deref(), Some("Abrahamic"));
//!
//! assert_nav_shape(&manifest, &[
//!     ("Abrahamic", &["Judaism", "Christianity"]),
//!     ("Dharmic", &["Buddhism"]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::resolve::{ResolvedSite, ResolvedTopic, ScripturePage};
use crate::scan::Manifest;
use crate::types::{Page, Topic};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups (panic with a clear message on miss)
// =========================================================================

/// Find a topic by slug. Panics if not found.
pub fn find_topic<'a>(manifest: &'a Manifest, slug: &str) -> &'a Topic {
    manifest
        .topics
        .iter()
        .find(|t| t.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.topics.iter().map(|t| t.slug.as_str()).collect();
            panic!("topic '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a page by slug. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, slug: &str) -> &'a Page {
    manifest
        .pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.pages.iter().map(|p| p.slug.as_str()).collect();
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a resolved topic by slug. Panics if not found.
pub fn find_resolved_topic<'a>(site: &'a ResolvedSite, slug: &str) -> &'a ResolvedTopic {
    site.topics
        .iter()
        .find(|t| t.topic.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = site.topics.iter().map(|t| t.topic.slug.as_str()).collect();
            panic!("resolved topic '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a scripture page by its reference, e.g. `"John 3:16"`. Panics if not
/// found.
pub fn find_scripture_page<'a>(site: &'a ResolvedSite, reference: &str) -> &'a ScripturePage {
    site.scripture
        .iter()
        .find(|p| p.reference.to_string() == reference)
        .unwrap_or_else(|| {
            let refs: Vec<String> = site.scripture.iter().map(|p| p.reference.to_string()).collect();
            panic!("scripture page '{reference}' not found. Available: {refs:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All topic titles in manifest order.
pub fn topic_titles(manifest: &Manifest) -> Vec<&str> {
    manifest.topics.iter().map(|t| t.title.as_str()).collect()
}

// =========================================================================
// Navigation helpers
// =========================================================================

/// Top-level navigation titles in order.
pub fn nav_titles(manifest: &Manifest) -> Vec<&str> {
    manifest
        .navigation
        .iter()
        .map(|n| n.title.as_str())
        .collect()
}

/// Child titles under a given nav parent. Panics if parent not found.
pub fn nav_children_titles<'a>(manifest: &'a Manifest, parent_title: &str) -> Vec<&'a str> {
    manifest
        .navigation
        .iter()
        .find(|n| n.title == parent_title)
        .map(|n| n.children.iter().map(|c| c.title.as_str()).collect())
        .unwrap_or_else(|| {
            let titles = nav_titles(manifest);
            panic!("nav item '{parent_title}' not found. Available: {titles:?}")
        })
}

/// Assert that the full navigation tree matches an expected shape.
///
/// Each entry is `(title, children)`. Use `&[]` for ungrouped topics.
pub fn assert_nav_shape(manifest: &Manifest, expected: &[(&str, &[&str])]) {
    let actual: Vec<&str> = nav_titles(manifest);
    let expected_titles: Vec<&str> = expected.iter().map(|(t, _)| *t).collect();
    assert_eq!(actual, expected_titles, "nav top-level titles mismatch");

    for (title, children) in expected {
        let actual_children = nav_children_titles(manifest, title);
        assert_eq!(
            actual_children,
            children.to_vec(),
            "nav children of '{title}' mismatch"
        );
    }
}
