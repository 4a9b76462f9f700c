//! CLI output formatting for lookups and pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (topic, page, scripture route) is its semantic identity,
//! a positional index and title or a reference, with filesystem paths shown
//! as secondary context via indented `Source:` lines or `→` targets.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Topics
//! 001 Abrahamic
//!     001 Judaism (2 entries)
//!         Source: topics/010-judaism.toml
//!     002 Christianity (2 entries)
//!         Source: topics/020-christianity.toml
//!     Working Notes (1 entries)
//!
//! Pages
//!     001 About This Site
//!         Source: about.md
//!
//! Config
//!     config.toml
//!     scripture/
//! ```
//!
//! ## Resolve
//!
//! ```text
//! Resolving 8 routes
//!     John 3 → scripture/john/3/ (2 verses)
//!     John 3:16 → scripture/john/3/16/ (3 translations, 2 commentaries)
//!     John 2 skipped: John 2 not found in NIV
//! Judaism: 3 passages
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 001 Judaism → topics/judaism/index.html
//! Scripture → scripture/index.html
//!     John 3 → scripture/john/3/index.html
//!
//! Generated 3 topics, 1 page, 6 scripture pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::resolve::{ResolveEvent, ResolvedSite};
use crate::routes::Route;
use crate::scan::Manifest;
use crate::scripture::{Chapter, Commentary, ParallelSet, Verse};
use crate::types::NavItem;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional entry count.
///
/// ```text
/// 001 Judaism (2 entries)
/// 001 Abrahamic
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({} entries)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Pluralize a count: `1 page`, `2 pages`.
fn plural(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the NavItem tree.
struct TreeNode {
    depth: usize,
    position: usize,
    title: String,
    path: String,
    is_container: bool,
}

/// Walk the navigation tree, assigning positional indices per sibling level.
fn walk_nav_tree(nav: &[NavItem]) -> Vec<TreeNode> {
    let mut nodes = Vec::new();
    walk_nav_tree_recursive(nav, 0, &mut nodes);
    nodes
}

fn walk_nav_tree_recursive(items: &[NavItem], depth: usize, nodes: &mut Vec<TreeNode>) {
    for (i, item) in items.iter().enumerate() {
        let is_container = !item.children.is_empty();
        nodes.push(TreeNode {
            depth,
            position: i + 1,
            title: item.title.clone(),
            path: item.path.clone(),
            is_container,
        });
        if is_container {
            walk_nav_tree_recursive(&item.children, depth + 1, nodes);
        }
    }
}

fn topic_slug(nav_path: &str) -> Option<&str> {
    nav_path.strip_prefix("topics/")
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing discovered topics, pages and config.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Topics".to_string());

    let mut shown = std::collections::HashSet::new();
    for node in walk_nav_tree(&manifest.navigation) {
        let base_indent = indent(node.depth);
        if node.is_container {
            lines.push(format!(
                "{}{}",
                base_indent,
                entity_header(node.position, &node.title, None)
            ));
            continue;
        }
        let Some(topic) = topic_slug(&node.path)
            .and_then(|slug| manifest.topics.iter().find(|t| t.slug == slug))
        else {
            continue;
        };
        shown.insert(topic.slug.as_str());
        lines.push(format!(
            "{}{}",
            base_indent,
            entity_header(node.position, &topic.title, Some(topic.entries.len()))
        ));
        lines.push(format!("{}    Source: {}", base_indent, topic.source_path));
        if let Some(intro) = &topic.intro {
            let preview = truncate(intro.lines().next().unwrap_or("").trim(), 60);
            if !preview.is_empty() {
                lines.push(format!("{}    {}", base_indent, preview));
            }
        }
    }

    // Topics hidden from nav (no number prefix)
    for topic in &manifest.topics {
        if !shown.contains(topic.slug.as_str()) {
            lines.push(format!(
                "    {} ({} entries)",
                topic.title,
                topic.entries.len()
            ));
        }
    }

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            lines.push(format!("    {} {}", format_index(i + 1), page.title));
            lines.push(format!("        Source: {}.md", page.slug));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    }
    if source_root.join(&manifest.config.source.data_dir).is_dir() {
        lines.push(format!("    {}/", manifest.config.source.data_dir));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Resolve output
// ============================================================================

/// Format a single resolve progress event as display lines.
pub fn format_resolve_event(event: &ResolveEvent) -> Vec<String> {
    match event {
        ResolveEvent::RoutesStarted { count } => {
            vec![format!("Resolving {}", plural(*count, "route", "routes"))]
        }
        ResolveEvent::ChapterResolved {
            path,
            reference,
            verses,
        } => vec![format!(
            "    {} \u{2192} {} ({})",
            reference,
            path,
            plural(*verses, "verse", "verses")
        )],
        ResolveEvent::VerseResolved {
            path,
            reference,
            translations,
            commentary,
        } => vec![format!(
            "    {} \u{2192} {} ({}, {})",
            reference,
            path,
            plural(*translations, "translation", "translations"),
            plural(*commentary, "commentary", "commentaries")
        )],
        ResolveEvent::RouteSkipped {
            reference, reason, ..
        } => vec![format!("    {} skipped: {}", reference, reason)],
        ResolveEvent::TopicResolved {
            title,
            passages,
            unavailable,
        } => {
            let mut line = format!("{}: {}", title, plural(*passages, "passage", "passages"));
            if *unavailable > 0 {
                line.push_str(&format!(" ({} unavailable)", unavailable));
            }
            vec![line]
        }
    }
}

/// Summary line after resolution.
pub fn format_resolve_summary(site: &ResolvedSite) -> Vec<String> {
    vec![format!(
        "Resolved {}, skipped {}",
        plural(site.scripture.len(), "scripture page", "scripture pages"),
        site.skipped.len()
    )]
}

pub fn print_resolve_summary(site: &ResolvedSite) {
    for line in format_resolve_summary(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// Format generate stage output showing generated HTML files.
pub fn format_generate_output(site: &ResolvedSite) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Home \u{2192} index.html".to_string());

    for (i, resolved) in site.topics.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} topics/{}/index.html",
            format_index(i + 1),
            resolved.topic.title,
            resolved.topic.slug
        ));
    }

    if !site.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in site.pages.iter().enumerate() {
            lines.push(format!(
                "    {} {} \u{2192} {}.html",
                format_index(i + 1),
                page.title,
                page.slug
            ));
        }
    }

    lines.push(String::new());
    lines.push("Scripture \u{2192} scripture/index.html".to_string());
    for page in &site.scripture {
        lines.push(format!(
            "    {} \u{2192} {}index.html",
            page.reference, page.path
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(site.topics.len(), "topic", "topics"),
        plural(site.pages.len(), "page", "pages"),
        plural(site.scripture.len(), "scripture page", "scripture pages")
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(site: &ResolvedSite) {
    for line in format_generate_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Lookup commands
// ============================================================================

pub fn format_verse(verse: &Verse) -> Vec<String> {
    let mut lines = vec![
        format!("{} ({})", verse.reference, verse.translation),
        format!("    {}", verse.text),
    ];
    if let Some(context) = &verse.context {
        lines.push("Context".to_string());
        lines.extend(context.lines().map(|l| format!("    {}", l)));
    }
    if !verse.cross_references.is_empty() {
        lines.push("Cross references".to_string());
        for xref in &verse.cross_references {
            if xref.preview.is_empty() {
                lines.push(format!("    {}", xref.reference));
            } else {
                lines.push(format!(
                    "    {}: {}",
                    xref.reference,
                    truncate(&xref.preview, 60)
                ));
            }
        }
    }
    lines
}

pub fn print_verse(verse: &Verse) {
    for line in format_verse(verse) {
        println!("{}", line);
    }
}

pub fn format_chapter(chapter: &Chapter) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", chapter.reference, chapter.translation)];
    lines.extend(
        chapter
            .verses
            .iter()
            .map(|v| format!("{:>4} {}", v.number, v.text)),
    );
    lines
}

pub fn print_chapter(chapter: &Chapter) {
    for line in format_chapter(chapter) {
        println!("{}", line);
    }
}

/// Translations in request order; missing ones are listed as unavailable.
pub fn format_parallel(set: &ParallelSet) -> Vec<String> {
    let mut lines = vec![set.reference.to_string()];
    for (translation, verse) in set.columns() {
        match verse {
            Some(v) => lines.push(format!("    {:<5} {}", translation.code(), v.text)),
            None => lines.push(format!("    {:<5} (unavailable)", translation.code())),
        }
    }
    lines
}

pub fn print_parallel(set: &ParallelSet) {
    for line in format_parallel(set) {
        println!("{}", line);
    }
}

pub fn format_commentary(reference: &str, entries: &[Commentary]) -> Vec<String> {
    if entries.is_empty() {
        return vec![format!("No commentary for {}", reference)];
    }
    let mut lines = vec![format!(
        "{} ({})",
        reference,
        plural(entries.len(), "commentary", "commentaries")
    )];
    for (i, entry) in entries.iter().enumerate() {
        let date = entry
            .date
            .as_deref()
            .map(|d| format!(", {}", d))
            .unwrap_or_default();
        lines.push(format!(
            "{} {}, {}{}",
            format_index(i + 1),
            entry.author,
            entry.source,
            date
        ));
        lines.push(format!("    {}", entry.text));
    }
    lines
}

pub fn print_commentary(reference: &str, entries: &[Commentary]) {
    for line in format_commentary(reference, entries) {
        println!("{}", line);
    }
}

pub fn format_routes(routes: &[Route]) -> Vec<String> {
    let mut lines: Vec<String> = routes
        .iter()
        .map(|r| {
            let depth = if r.is_chapter() { 0 } else { 1 };
            format!("{}{} \u{2192} {}", indent(depth), r.reference, r.path)
        })
        .collect();
    lines.push(plural(routes.len(), "route", "routes"));
    lines
}

pub fn print_routes(routes: &[Route]) {
    for line in format_routes(routes) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
