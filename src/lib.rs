//! # Lectern
//!
//! Scripture retrieval and parallel-translation publishing for a
//! comparative-religion content site. Topic pages (traditions, doctrines,
//! historical themes) are written as TOML; scripture text comes from a
//! pluggable source and is rendered as chapter and verse pages with the
//! configured translations side by side.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Lectern builds a site through three independent stages, each producing a
//! JSON manifest that the next stage consumes:
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (topic files + pages → structured data)
//! 2. Resolve   manifest  →  resolved.json    (routes + passages → scripture text)
//! 3. Generate  resolved  →  dist/            (final HTML site)
//! ```
//!
//! Only the resolve stage talks to a scripture source. Generation is a pure
//! function of the resolved manifest, so a site can be re-rendered without
//! re-fetching anything.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`books`] | The 66-book canon with abbreviations, used to normalize references |
//! | [`reference`] | `Book C:V` references and translation codes |
//! | [`scripture`] | Verses, chapters, commentary and parallel sets |
//! | [`source`] | The `ScriptureSource` trait plus local-dataset and HTTP adapters |
//! | [`service`] | Lookup entry points: verse, chapter, parallel verses, commentary |
//! | [`routes`] | Expands the `[routes]` config into scripture page paths |
//! | [`scan`] | Stage 1: reads topics, pages and config into the scan manifest |
//! | [`resolve`] | Stage 2: fetches every passage the site needs |
//! | [`generate`] | Stage 3: renders HTML with Maud |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Shared types serialized between stages (`Topic`, `Page`, `NavItem`) |
//! | [`naming`] | `NNN-name` filename convention parser |
//! | [`output`] | CLI output formatting for lookups and pipeline results |
//!
//! # Design Decisions
//!
//! ## One Source Per Service
//!
//! A [`service::ScriptureService`] borrows a single [`source::ScriptureSource`].
//! Tests swap in an in-memory source; the CLI picks a local dataset or an HTTP
//! API from `[source]` in `config.toml`. Nothing is cached between calls.
//!
//! ## Partial Parallel Sets
//!
//! A parallel lookup never fails because one translation is missing. Each
//! translation resolves on its own; those that fail are left out of the set
//! and the page shows them as unavailable.
//!
//! ## NNN-Prefix Ordering
//!
//! Topic files and pages use a numeric prefix (`010-`, `020-`) for explicit
//! ordering, parsed by [`naming::parse_entry_name`]. Entries without a prefix
//! are built but hidden from navigation.

pub mod books;
pub mod config;
pub mod generate;
pub mod naming;
pub mod output;
pub mod reference;
pub mod resolve;
pub mod routes;
pub mod scan;
pub mod scripture;
pub mod service;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
