//! Scripture retrieval service.
//!
//! [`ScriptureService`] is the single entry point pages use to look up text.
//! It validates input against the configured translation set and canon, then
//! asks its [`ScriptureSource`] for the passage.
//!
//! ## Failure policy
//!
//! | Call | On failure |
//! |---|---|
//! | [`get_verse`](ScriptureService::get_verse) | error returned to the caller |
//! | [`get_chapter`](ScriptureService::get_chapter) | error returned to the caller |
//! | [`get_parallel_verses`](ScriptureService::get_parallel_verses) | failed translation omitted, warning logged |
//! | [`get_commentary`](ScriptureService::get_commentary) | error returned; "no commentary" is `Ok(vec![])` |
//!
//! No retries, no caching: every call goes to the source.

use crate::config::TranslationsConfig;
use crate::reference::{Reference, ReferenceError, Translation};
use crate::scripture::{Chapter, Commentary, ParallelSet, Verse};
use crate::source::{ScriptureSource, SourceError};
use log::{debug, warn};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptureError {
    #[error("{reference} not found in {translation}")]
    NotFound {
        reference: String,
        translation: String,
    },
    #[error("unsupported translation '{0}'")]
    UnsupportedTranslation(String),
    #[error("scripture source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl From<ReferenceError> for ScriptureError {
    fn from(err: ReferenceError) -> Self {
        ScriptureError::InvalidReference(err.to_string())
    }
}

/// Which books a service will resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Canon {
    /// Any book the source knows.
    #[default]
    Bible,
    /// The five books of Moses only.
    Torah,
}

impl Canon {
    fn admits(&self, reference: &Reference) -> bool {
        match self {
            Canon::Bible => true,
            Canon::Torah => reference
                .canonical_book()
                .map(|b| b.is_torah())
                .unwrap_or(false),
        }
    }
}

pub struct ScriptureService<'a> {
    source: &'a dyn ScriptureSource,
    supported: Vec<Translation>,
    canon: Canon,
}

impl<'a> ScriptureService<'a> {
    pub fn new(source: &'a dyn ScriptureSource, translations: &TranslationsConfig) -> Self {
        Self {
            source,
            supported: translations
                .supported
                .iter()
                .map(|c| Translation::new(c))
                .collect(),
            canon: Canon::Bible,
        }
    }

    pub fn with_canon(mut self, canon: Canon) -> Self {
        self.canon = canon;
        self
    }

    /// Resolve a translation code against the supported set.
    pub fn translation(&self, code: &str) -> Result<Translation, ScriptureError> {
        let t = Translation::new(code);
        if self.supported.contains(&t) {
            Ok(t)
        } else {
            Err(ScriptureError::UnsupportedTranslation(code.trim().to_string()))
        }
    }

    /// Text of a single verse in one translation.
    ///
    /// The returned verse echoes the canonical reference and the normalized
    /// translation code.
    pub fn get_verse(&self, reference: &str, translation: &str) -> Result<Verse, ScriptureError> {
        let reference = Reference::parse(reference)?;
        let translation = self.translation(translation)?;
        self.verse(&reference, &translation)
    }

    /// Same as [`get_verse`](Self::get_verse) for an already-parsed reference.
    pub fn verse(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<Verse, ScriptureError> {
        if reference.verse().is_none() {
            return Err(ScriptureError::InvalidReference(format!(
                "{reference} names a whole chapter"
            )));
        }
        self.check_lookup(reference, translation)?;
        debug!("fetching {reference} ({translation})");
        self.source
            .fetch_verse(reference, translation)
            .map_err(|e| lookup_error(e, reference, translation))
    }

    /// Every verse of the chapter `reference` points into.
    pub fn get_chapter(
        &self,
        reference: &str,
        translation: &str,
    ) -> Result<Chapter, ScriptureError> {
        let reference = Reference::parse(reference)?;
        let translation = self.translation(translation)?;
        self.chapter(&reference, &translation)
    }

    pub fn chapter(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<Chapter, ScriptureError> {
        let reference = reference.chapter_reference();
        self.check_lookup(&reference, translation)?;
        debug!("fetching chapter {reference} ({translation})");
        self.source
            .fetch_chapter(&reference, translation)
            .map_err(|e| lookup_error(e, &reference, translation))
    }

    /// One passage across several translations.
    ///
    /// Each translation resolves independently and in parallel; one that
    /// fails is left out of the set and logged. Only an unparseable reference
    /// fails the whole call.
    pub fn get_parallel_verses(
        &self,
        reference: &str,
        translations: &[&str],
    ) -> Result<ParallelSet, ScriptureError> {
        let reference = Reference::parse(reference)?;
        let translations: Vec<Translation> =
            translations.iter().map(|c| Translation::new(c)).collect();
        Ok(self.parallel(&reference, &translations))
    }

    pub fn parallel(&self, reference: &Reference, translations: &[Translation]) -> ParallelSet {
        let mut set = ParallelSet::new(reference.clone(), translations.to_vec());

        let mut unique: Vec<&Translation> = Vec::with_capacity(translations.len());
        for t in translations {
            if !unique.contains(&t) {
                unique.push(t);
            }
        }

        let results: Vec<(&Translation, Result<Verse, ScriptureError>)> = unique
            .par_iter()
            .map(|&t| (t, self.verse(reference, t)))
            .collect();

        for (translation, result) in results {
            match result {
                Ok(verse) => {
                    if let Err(e) = set.insert(verse) {
                        warn!("dropping {translation} from parallel set: {e}");
                    }
                }
                Err(e) => warn!("{reference} unavailable in {translation}: {e}"),
            }
        }
        set
    }

    /// Commentary on a passage, in source order. None is not an error.
    pub fn get_commentary(&self, reference: &str) -> Result<Vec<Commentary>, ScriptureError> {
        let reference = Reference::parse(reference)?;
        self.commentary(&reference)
    }

    pub fn commentary(&self, reference: &Reference) -> Result<Vec<Commentary>, ScriptureError> {
        if !self.canon.admits(reference) {
            return Ok(Vec::new());
        }
        self.source.fetch_commentary(reference).map_err(|e| match e {
            SourceError::NotFound(_) => ScriptureError::NotFound {
                reference: reference.to_string(),
                translation: "commentary".to_string(),
            },
            other => ScriptureError::SourceUnavailable(other.to_string()),
        })
    }

    fn check_lookup(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<(), ScriptureError> {
        if !self.supported.contains(translation) {
            return Err(ScriptureError::UnsupportedTranslation(
                translation.to_string(),
            ));
        }
        if !self.canon.admits(reference) {
            return Err(ScriptureError::NotFound {
                reference: reference.to_string(),
                translation: translation.to_string(),
            });
        }
        Ok(())
    }
}

fn lookup_error(err: SourceError, reference: &Reference, translation: &Translation) -> ScriptureError {
    match err {
        SourceError::NotFound(_) => ScriptureError::NotFound {
            reference: reference.to_string(),
            translation: translation.to_string(),
        },
        other => ScriptureError::SourceUnavailable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::tests::MockSource;

    fn source() -> MockSource {
        MockSource::new()
            .with_verse("John 3:16", "NIV", "For God so loved the world")
            .with_verse("John 3:16", "KJV", "For God so loved the world, that he gave")
            .with_verse("John 3:16", "ESV", "For God so loved the world, that he gave his only Son")
            .with_verse("Genesis 1:1", "NIV", "In the beginning God created")
            .with_verse("Genesis 1:1", "ESV", "In the beginning, God created")
            .with_verse("Genesis 1:1", "KJV", "In the beginning God created the heaven")
            .with_verse("Genesis 1:2", "NIV", "Now the earth was formless")
            .with_verse("Joshua 1:9", "NIV", "Be strong and courageous")
            .with_commentary(
                "John 3:16",
                vec![
                    Commentary {
                        author: "Matthew Henry".to_string(),
                        source: "Commentary on the Whole Bible".to_string(),
                        text: "God so loved the world.".to_string(),
                        date: Some("1706".to_string()),
                    },
                    Commentary {
                        author: "John Gill".to_string(),
                        source: "Exposition of the Bible".to_string(),
                        text: "Not the elect only.".to_string(),
                        date: None,
                    },
                ],
            )
    }

    fn service(source: &MockSource) -> ScriptureService<'_> {
        ScriptureService::new(source, &TranslationsConfig::default())
    }

    // =========================================================================
    // get_verse
    // =========================================================================

    #[test]
    fn get_verse_echoes_reference_and_translation() {
        let source = source();
        let verse = service(&source).get_verse("John 3:16", "NIV").unwrap();
        assert_eq!(verse.reference, "John 3:16");
        assert_eq!(verse.translation.code(), "NIV");
        assert!(!verse.text.is_empty());
    }

    #[test]
    fn get_verse_normalizes_input() {
        let source = source();
        let verse = service(&source).get_verse("jn 3:16", "kjv").unwrap();
        assert_eq!(verse.reference, "John 3:16");
        assert_eq!(verse.translation.code(), "KJV");
    }

    #[test]
    fn get_verse_unknown_book_is_not_found() {
        let source = source();
        let err = service(&source).get_verse("FakeBook 1:1", "NIV").unwrap_err();
        assert!(matches!(err, ScriptureError::NotFound { .. }));
    }

    #[test]
    fn get_verse_unsupported_translation() {
        let source = source();
        let err = service(&source).get_verse("John 3:16", "NASB").unwrap_err();
        assert!(matches!(err, ScriptureError::UnsupportedTranslation(code) if code == "NASB"));
        // Rejected before the source is asked
        assert!(source.get_calls().is_empty());
    }

    #[test]
    fn get_verse_empty_reference_is_invalid() {
        let source = source();
        let err = service(&source).get_verse("", "NIV").unwrap_err();
        assert!(matches!(err, ScriptureError::InvalidReference(_)));
    }

    #[test]
    fn get_verse_on_chapter_reference_is_invalid() {
        let source = source();
        let err = service(&source).get_verse("John 3", "NIV").unwrap_err();
        assert!(matches!(err, ScriptureError::InvalidReference(_)));
    }

    #[test]
    fn get_verse_source_failure_is_unavailable() {
        let source = source().with_unavailable("ESV");
        let err = service(&source).get_verse("John 3:16", "ESV").unwrap_err();
        assert!(matches!(err, ScriptureError::SourceUnavailable(_)));
    }

    // =========================================================================
    // get_parallel_verses
    // =========================================================================

    #[test]
    fn parallel_resolves_every_translation() {
        let source = source();
        let set = service(&source)
            .get_parallel_verses("Genesis 1:1", &["NIV", "ESV", "KJV"])
            .unwrap();
        assert_eq!(set.len(), 3);
        for code in ["NIV", "ESV", "KJV"] {
            let verse = set.get(&Translation::new(code)).unwrap();
            assert_eq!(verse.translation.code(), code);
            assert_eq!(verse.reference, "Genesis 1:1");
        }
    }

    #[test]
    fn parallel_omits_unresolvable_translation() {
        let source = source();
        let set = service(&source)
            .get_parallel_verses("John 3:16", &["NIV", "WEB", "KJV"])
            .unwrap();
        let codes: Vec<&str> = set.translations().map(|t| t.code()).collect();
        assert_eq!(codes, vec!["KJV", "NIV"]);
        let missing: Vec<&str> = set.missing().iter().map(|t| t.code()).collect();
        assert_eq!(missing, vec!["WEB"]);
    }

    #[test]
    fn parallel_omits_unavailable_and_unsupported() {
        let source = source().with_unavailable("ESV");
        let set = service(&source)
            .get_parallel_verses("John 3:16", &["NIV", "ESV", "NASB"])
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.missing().len(), 2);
    }

    #[test]
    fn parallel_duplicate_codes_fetch_once() {
        let source = source();
        let set = service(&source)
            .get_parallel_verses("John 3:16", &["NIV", "niv"])
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(source.get_calls().len(), 1);
    }

    #[test]
    fn parallel_bad_reference_is_error() {
        let source = source();
        assert!(
            service(&source)
                .get_parallel_verses("", &["NIV"])
                .is_err()
        );
    }

    // =========================================================================
    // get_commentary
    // =========================================================================

    #[test]
    fn commentary_in_source_order() {
        let source = source();
        let notes = service(&source).get_commentary("John 3:16").unwrap();
        let authors: Vec<&str> = notes.iter().map(|c| c.author.as_str()).collect();
        assert_eq!(authors, vec!["Matthew Henry", "John Gill"]);
    }

    #[test]
    fn commentary_empty_is_ok() {
        let source = source();
        let notes = service(&source).get_commentary("Genesis 1:2").unwrap();
        assert!(notes.is_empty());
    }

    // =========================================================================
    // get_chapter
    // =========================================================================

    #[test]
    fn chapter_from_verse_reference() {
        let source = source();
        let chapter = service(&source).get_chapter("Genesis 1:2", "NIV").unwrap();
        assert_eq!(chapter.reference, "Genesis 1");
        assert_eq!(chapter.verses.len(), 2);
    }

    #[test]
    fn chapter_missing_is_not_found() {
        let source = source();
        let err = service(&source).get_chapter("Genesis 50", "NIV").unwrap_err();
        assert!(matches!(err, ScriptureError::NotFound { .. }));
    }

    // =========================================================================
    // Canon
    // =========================================================================

    #[test]
    fn torah_canon_resolves_pentateuch() {
        let source = source();
        let verse = service(&source)
            .with_canon(Canon::Torah)
            .get_verse("Genesis 1:1", "NIV")
            .unwrap();
        assert_eq!(verse.reference, "Genesis 1:1");
    }

    #[test]
    fn torah_canon_rejects_other_books() {
        let source = source();
        let svc = service(&source).with_canon(Canon::Torah);
        let err = svc.get_verse("Joshua 1:9", "NIV").unwrap_err();
        assert!(matches!(err, ScriptureError::NotFound { .. }));
        assert!(svc.get_commentary("John 3:16").unwrap().is_empty());
        assert!(source.get_calls().is_empty());
    }
}
