//! Static scripture route enumeration.
//!
//! The `[routes]` config names which books get pages and how far into each
//! book to go. This module expands that into the concrete list of pages:
//!
//! ```text
//! books = ["John"], max_chapter = 2, max_verse = 2
//!
//! scripture/john/1/      John 1
//! scripture/john/1/1/    John 1:1
//! scripture/john/1/2/    John 1:2
//! scripture/john/2/      John 2
//! ...
//! ```
//!
//! The ranges are upper bounds, not facts about the text: a route may point
//! past the end of a short book. Whether it resolves is decided at lookup
//! time.

use crate::config::RoutesConfig;
use crate::reference::{Reference, ReferenceError};
use serde::{Deserialize, Serialize};

/// A scripture page to pre-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub reference: Reference,
    /// Output directory relative to the site root, with trailing slash.
    pub path: String,
}

impl Route {
    pub fn for_reference(reference: Reference) -> Self {
        let path = match reference.verse() {
            Some(v) => format!(
                "scripture/{}/{}/{}/",
                reference.book_slug(),
                reference.chapter(),
                v
            ),
            None => format!(
                "scripture/{}/{}/",
                reference.book_slug(),
                reference.chapter()
            ),
        };
        Self { reference, path }
    }

    pub fn is_chapter(&self) -> bool {
        self.reference.verse().is_none()
    }
}

/// Expand route config into pages, in book order then chapter then verse.
/// Each chapter page comes before its verse pages.
pub fn enumerate(config: &RoutesConfig) -> Result<Vec<Route>, ReferenceError> {
    let mut routes = Vec::new();
    for book in &config.books {
        for chapter in 1..=config.max_chapter {
            let chapter_ref = Reference::new(book, chapter, None)?;
            let verses: Vec<Reference> = (1..=config.max_verse)
                .map(|v| chapter_ref.with_verse(v))
                .collect();
            routes.push(Route::for_reference(chapter_ref));
            routes.extend(verses.into_iter().map(Route::for_reference));
        }
    }
    Ok(routes)
}
