//! Scripture data sources.
//!
//! The [`ScriptureSource`] trait is the seam between the retrieval service and
//! wherever the text actually lives. Two adapters ship:
//!
//! | Adapter | Backing store |
//! |---|---|
//! | [`LocalSource`] | JSON dataset directory (`translations/*.json`, `commentary.json`, `cross_references.json`) |
//! | [`RemoteSource`] | JSON web service over HTTP |
//!
//! Sources know nothing about which translations the site supports or which
//! canon a page restricts to; the service enforces both before a source is
//! asked.

pub mod local;
pub mod remote;

use crate::config::{SourceConfig, SourceKind};
use crate::reference::{Reference, Translation};
use crate::scripture::{Chapter, Commentary, Verse};
use std::path::Path;
use thiserror::Error;

pub use local::LocalSource;
pub use remote::RemoteSource;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("invalid dataset: {0}")]
    Dataset(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Anything that can resolve references to text.
///
/// `Sync` so the service can resolve several translations from one source
/// on rayon's pool.
pub trait ScriptureSource: Sync {
    /// Text of a single verse. `reference` always carries a verse number.
    fn fetch_verse(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<Verse, SourceError>;

    /// Every verse of a chapter, in order.
    fn fetch_chapter(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<Chapter, SourceError>;

    /// Commentary attached to a passage. No commentary is `Ok(vec![])`.
    fn fetch_commentary(&self, reference: &Reference) -> Result<Vec<Commentary>, SourceError>;
}

/// Build the source described by config. Relative dataset paths resolve
/// against the content root.
pub fn open_source(
    config: &SourceConfig,
    content_root: &Path,
) -> Result<Box<dyn ScriptureSource>, SourceError> {
    match config.kind {
        SourceKind::Local => {
            let dir = content_root.join(&config.data_dir);
            Ok(Box::new(LocalSource::open(&dir)?))
        }
        SourceKind::Remote => Ok(Box::new(RemoteSource::new(
            &config.base_url,
            std::time::Duration::from_secs(config.timeout_secs),
        )?)),
    }
}
