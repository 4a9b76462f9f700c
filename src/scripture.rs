//! Retrieved scripture: verses, chapters, commentary, and parallel sets.
//!
//! These are built fresh by each retrieval call and never mutated after the
//! call returns. They serialize into the resolve manifest so the generate
//! stage can render them without touching the source again.

use crate::reference::{Reference, Translation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A passage pointed to from another verse, with a short preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub reference: Reference,
    #[serde(default)]
    pub preview: String,
}

/// Text of one verse in one translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Canonical reference string, e.g. `John 3:16`.
    pub reference: String,
    pub translation: Translation,
    pub text: String,
    /// Neighbouring verses, when the source provides them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_references: Vec<CrossReference>,
}

/// A numbered line within a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseLine {
    pub number: u32,
    pub text: String,
}

/// A whole chapter in one translation, verses in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub reference: String,
    pub translation: Translation,
    pub verses: Vec<VerseLine>,
}

/// A scholarly note attached to a passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commentary {
    pub author: String,
    pub source: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParallelSetError {
    #[error("verse {verse} does not belong to parallel set for {expected}")]
    PassageMismatch { expected: String, verse: String },
    #[error("parallel set for {0} already has a {1} entry")]
    DuplicateTranslation(String, Translation),
}

/// One passage across several translations, for side-by-side display.
///
/// Holds at most one verse per translation code, and every verse must name
/// the set's passage. The requested order is kept so that callers can show
/// the translations that came back empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelSet {
    pub reference: Reference,
    requested: Vec<Translation>,
    entries: BTreeMap<Translation, Verse>,
}

impl ParallelSet {
    pub fn new(reference: Reference, requested: Vec<Translation>) -> Self {
        let mut seen = Vec::with_capacity(requested.len());
        for t in requested {
            if !seen.contains(&t) {
                seen.push(t);
            }
        }
        Self {
            reference,
            requested: seen,
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, verse: Verse) -> Result<(), ParallelSetError> {
        let expected = self.reference.to_string();
        if verse.reference != expected {
            return Err(ParallelSetError::PassageMismatch {
                expected,
                verse: verse.reference,
            });
        }
        if self.entries.contains_key(&verse.translation) {
            return Err(ParallelSetError::DuplicateTranslation(
                expected,
                verse.translation,
            ));
        }
        self.entries.insert(verse.translation.clone(), verse);
        Ok(())
    }

    pub fn get(&self, translation: &Translation) -> Option<&Verse> {
        self.entries.get(translation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Translation codes that have an entry, in code order.
    pub fn translations(&self) -> impl Iterator<Item = &Translation> {
        self.entries.keys()
    }

    /// Requested translations in request order, each with its verse if one
    /// resolved.
    pub fn columns(&self) -> impl Iterator<Item = (&Translation, Option<&Verse>)> {
        self.requested.iter().map(|t| (t, self.entries.get(t)))
    }

    /// Requested translations with no entry.
    pub fn missing(&self) -> Vec<&Translation> {
        self.requested
            .iter()
            .filter(|t| !self.entries.contains_key(*t))
            .collect()
    }
}
