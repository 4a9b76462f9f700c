//! Content scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the content directory and produces a
//! [`Manifest`] that the resolve stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml                  # Site configuration (optional)
//! ├── 040-about.md                 # Page (numbered = appears in nav)
//! ├── topics/
//! │   ├── 010-judaism.toml         # Topic page (numbered = appears in nav)
//! │   ├── 020-christianity.toml
//! │   └── drafts.toml              # Unnumbered = built, hidden from nav
//! └── scripture/                   # Local scripture dataset (see source::local)
//! ```
//!
//! ## Topic Files
//!
//! ```toml
//! title = "Judaism"
//! tradition = "Abrahamic"          # Groups topics in navigation
//! intro = "Markdown introduction."
//!
//! [[entries]]
//! title = "Covenant at Sinai"
//! key_points = ["..."]
//! historical_references = ["..."]
//! significance = "Markdown."
//! elements = ["..."]
//! practices = ["..."]
//! recommended_reading = ["..."]
//! passages = ["Exodus 20:2"]
//! ```
//!
//! ## Validation
//!
//! - No two topics share a number
//! - No two topics share a slug
//! - Every topic has at least one entry
//! - Every passage parses as a reference

use crate::config::{self, SiteConfig};
use crate::naming::parse_entry_name;
use crate::types::{ContentEntry, NavItem, Page, Topic};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid topic file {path}: {source}")]
    Topic {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Duplicate topic number {0} in {1} and {2}")]
    DuplicateNumber(u32, PathBuf, PathBuf),
    #[error("Duplicate topic slug '{0}'")]
    DuplicateSlug(String),
    #[error("Topic has no entries: {0}")]
    EmptyTopic(PathBuf),
}

/// Manifest output from the scan stage
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub navigation: Vec<NavItem>,
    pub topics: Vec<Topic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    pub config: SiteConfig,
}

/// On-disk shape of a topic file.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TopicFile {
    title: String,
    #[serde(default)]
    tradition: Option<String>,
    #[serde(default)]
    intro: Option<String>,
    #[serde(default)]
    entries: Vec<ContentEntry>,
}

const TOPICS_DIR: &str = "topics";

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let topics = parse_topics(root)?;
    let pages = parse_pages(root)?;
    let navigation = build_navigation(&topics);

    Ok(Manifest {
        navigation,
        topics,
        pages,
        config,
    })
}

/// Parse every `topics/*.toml` file, sorted by number then slug.
fn parse_topics(root: &Path) -> Result<Vec<Topic>, ScanError> {
    let dir = root.join(TOPICS_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut topics = Vec::new();
    let mut numbers: BTreeMap<u32, PathBuf> = BTreeMap::new();

    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        let is_toml = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !entry.file_type().is_file() || !is_toml || hidden {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed = parse_entry_name(&stem);

        if let Some(num) = parsed.number {
            if let Some(existing) = numbers.get(&num) {
                return Err(ScanError::DuplicateNumber(
                    num,
                    existing.clone(),
                    path.to_path_buf(),
                ));
            }
            numbers.insert(num, path.to_path_buf());
        }

        let content = fs::read_to_string(path)?;
        let file: TopicFile = toml::from_str(&content).map_err(|source| ScanError::Topic {
            path: path.to_path_buf(),
            source,
        })?;
        if file.entries.is_empty() {
            return Err(ScanError::EmptyTopic(path.to_path_buf()));
        }

        let source_path = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        topics.push(Topic {
            title: file.title,
            slug: parsed.slug.clone(),
            tradition: file.tradition.filter(|t| !t.trim().is_empty()),
            intro: file.intro.filter(|i| !i.trim().is_empty()),
            entries: file.entries,
            in_nav: parsed.in_nav(),
            sort_key: parsed.sort_key(),
            source_path,
        });
    }

    topics.sort_by(|a, b| (a.sort_key, &a.slug).cmp(&(b.sort_key, &b.slug)));

    let mut slugs: Vec<&str> = topics.iter().map(|t| t.slug.as_str()).collect();
    slugs.sort_unstable();
    if let Some(dup) = slugs.windows(2).find(|w| w[0] == w[1]) {
        return Err(ScanError::DuplicateSlug(dup[0].to_string()));
    }

    Ok(topics)
}

/// Parse all markdown files in the root directory into pages.
///
/// Numbered files (`NNN-name.md`) appear in navigation sorted by number;
/// unnumbered files are generated but hidden.
fn parse_pages(root: &Path) -> Result<Vec<Page>, ScanError> {
    let mut md_files: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();

    md_files.sort();

    let mut pages = Vec::new();
    for md_path in &md_files {
        let stem = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed = parse_entry_name(&stem);
        let link_title = parsed.display_title.clone();

        let content = fs::read_to_string(md_path)?;
        let title = content
            .lines()
            .find(|line| line.starts_with("# "))
            .map(|line| line.trim_start_matches("# ").trim().to_string())
            .unwrap_or_else(|| link_title.clone());

        pages.push(Page {
            title,
            link_title,
            slug: parsed.slug.clone(),
            body: content,
            in_nav: parsed.in_nav(),
            sort_key: parsed.sort_key(),
        });
    }

    pages.sort_by_key(|p| p.sort_key);
    Ok(pages)
}

/// Navigation for numbered topics. Topics sharing a tradition are grouped
/// under it; the group sits where its first topic would.
fn build_navigation(topics: &[Topic]) -> Vec<NavItem> {
    let mut nav: Vec<NavItem> = Vec::new();
    for topic in topics.iter().filter(|t| t.in_nav) {
        let item = NavItem {
            title: topic.title.clone(),
            path: format!("topics/{}", topic.slug),
            children: vec![],
        };
        match &topic.tradition {
            Some(tradition) => {
                let group_path = format!("traditions/{}", crate::books::slugify(tradition));
                match nav.iter_mut().find(|n| n.path == group_path) {
                    Some(group) => group.children.push(item),
                    None => nav.push(NavItem {
                        title: tradition.clone(),
                        path: group_path,
                        children: vec![item],
                    }),
                }
            }
            None => nav.push(item),
        }
    }
    nav
}
