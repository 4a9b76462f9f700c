//! Scripture references and translation codes.
//!
//! A [`Reference`] names a passage: a book, a chapter, and optionally a verse.
//! It is built once from route parameters or user input and used as the key
//! for every lookup. The translation travels alongside it as a
//! [`Translation`] code.
//!
//! ## Parsing
//!
//! The last whitespace-separated token is `chapter[:verse]`; everything before
//! it is the book:
//!
//! - `"John 3:16"` → John, chapter 3, verse 16
//! - `"1 Cor 13"` → 1 Corinthians, chapter 13
//! - `"Song of Solomon 2:1"` → Song of Solomon, chapter 2, verse 1
//!
//! Known books and abbreviations normalize to their canonical names. Unknown
//! book names are kept as written: `"FakeBook 1:1"` parses, and the lookup
//! reports it as not found.

use crate::books::{self, Book};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("reference is empty")]
    Empty,
    #[error("reference '{0}' has no book name")]
    MissingBook(String),
    #[error("reference '{0}' has no chapter number")]
    MissingChapter(String),
    #[error("invalid chapter or verse number in '{0}'")]
    BadNumber(String),
}

/// A pointer to a scripture passage. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
    book: String,
    chapter: u32,
    verse: Option<u32>,
}

impl Reference {
    /// Build a reference from parts. The book name is normalized the same way
    /// [`Reference::parse`] normalizes it.
    pub fn new(book: &str, chapter: u32, verse: Option<u32>) -> Result<Self, ReferenceError> {
        let book = book.trim();
        if book.is_empty() {
            return Err(ReferenceError::MissingBook(book.to_string()));
        }
        if chapter == 0 || verse == Some(0) {
            return Err(ReferenceError::BadNumber(format!(
                "{} {}",
                book,
                chapter
            )));
        }
        let book = books::find_book(book)
            .map(|b| b.name.to_string())
            .unwrap_or_else(|| book.split_whitespace().collect::<Vec<_>>().join(" "));
        Ok(Self {
            book,
            chapter,
            verse,
        })
    }

    pub fn parse(input: &str) -> Result<Self, ReferenceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ReferenceError::Empty);
        }
        let (book, locator) = match input.rsplit_once(char::is_whitespace) {
            Some((book, locator)) => (book.trim(), locator),
            None => {
                return if input.chars().any(|c| c.is_ascii_digit()) {
                    Err(ReferenceError::MissingBook(input.to_string()))
                } else {
                    Err(ReferenceError::MissingChapter(input.to_string()))
                };
            }
        };
        if book.is_empty() {
            return Err(ReferenceError::MissingBook(input.to_string()));
        }

        let (chapter, verse) = match locator.split_once(':') {
            Some((c, v)) => (c, Some(v)),
            None => (locator, None),
        };
        let chapter: u32 = chapter
            .parse()
            .map_err(|_| ReferenceError::BadNumber(input.to_string()))?;
        let verse = verse
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|_| ReferenceError::BadNumber(input.to_string()))?;
        if chapter == 0 || verse == Some(0) {
            return Err(ReferenceError::BadNumber(input.to_string()));
        }

        Self::new(book, chapter, verse)
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse(&self) -> Option<u32> {
        self.verse
    }

    /// The canonical book entry, if the book is one we know.
    pub fn canonical_book(&self) -> Option<&'static Book> {
        books::find_book(&self.book)
    }

    /// URL path segment for the book.
    pub fn book_slug(&self) -> String {
        books::slugify(&self.book)
    }

    /// The same passage without its verse number.
    pub fn chapter_reference(&self) -> Self {
        Self {
            book: self.book.clone(),
            chapter: self.chapter,
            verse: None,
        }
    }

    /// The same chapter at another verse.
    pub fn with_verse(&self, verse: u32) -> Self {
        Self {
            book: self.book.clone(),
            chapter: self.chapter,
            verse: Some(verse),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verse {
            Some(v) => write!(f, "{} {}:{}", self.book, self.chapter, v),
            None => write!(f, "{} {}", self.book, self.chapter),
        }
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// References travel through the manifests as their display string.
impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// An upper-case translation code such as `NIV` or `KJV`.
///
/// Construction only normalizes case; whether the code is supported is
/// decided by the configured translation set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translation(String);

impl Translation {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Translation {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}
