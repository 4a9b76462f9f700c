//! Shared types used across pipeline stages.
//!
//! These are serialized to JSON between stages (scan → resolve → generate)
//! so each manifest can be inspected on disk.

use crate::reference::Reference;
use serde::{Deserialize, Serialize};

/// A page generated from a markdown file in the content root.
///
/// Numbered files (`NNN-name.md`) appear in navigation sorted by number;
/// unnumbered files are generated but hidden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Title from first `# heading` in markdown, or link_title as fallback
    pub title: String,
    /// Display label in nav (filename with number stripped and dashes → spaces)
    pub link_title: String,
    /// URL slug (filename stem with number prefix stripped)
    pub slug: String,
    /// Raw markdown content
    pub body: String,
    pub in_nav: bool,
    pub sort_key: u32,
}

/// One content card on a topic page.
///
/// Every list may be empty; empty lists are not rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentEntry {
    pub title: String,
    pub key_points: Vec<String>,
    pub historical_references: Vec<String>,
    /// Markdown.
    pub significance: String,
    pub elements: Vec<String>,
    pub practices: Vec<String>,
    pub recommended_reading: Vec<String>,
    /// Passages quoted under the entry, resolved in the default translation.
    pub passages: Vec<Reference>,
}

/// A topic page: a tradition, doctrine, or historical theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    /// URL slug (filename stem with number prefix stripped)
    pub slug: String,
    /// Navigation group, e.g. "Abrahamic". Ungrouped topics sit at top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tradition: Option<String>,
    /// Markdown introduction shown above the entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    pub entries: Vec<ContentEntry>,
    pub in_nav: bool,
    pub sort_key: u32,
    /// Source file relative to the content root.
    pub source_path: String,
}

/// Navigation tree item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}
