//! Scripture web service over HTTP.
//!
//! Endpoints, relative to the configured base URL:
//!
//! ```text
//! GET {base}/{CODE}/{book-slug}/{chapter}/{verse}      → verse body
//! GET {base}/{CODE}/{book-slug}/{chapter}              → {"verses": [{"number", "text"}]}
//! GET {base}/commentary/{book-slug}/{chapter}/{verse}  → [{"author", "source", "text", "date"?}]
//! ```
//!
//! A verse body is `{"text", "context"?, "cross_references"?: [{"reference", "preview"?}]}`.
//! 404 means the passage does not exist in that translation; any other
//! failure is reported as the source being unavailable. Missing commentary
//! (404) is an empty list.
//!
//! Only canonical book names are sent. A passage in any other book is
//! NotFound without a request, and has no commentary.

use super::{ScriptureSource, SourceError};
use crate::reference::{Reference, Translation};
use crate::scripture::{Chapter, Commentary, CrossReference, Verse, VerseLine};
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Deserialize)]
struct VerseBody {
    text: String,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    cross_references: Vec<CrossReference>,
}

#[derive(Deserialize)]
struct ChapterBody {
    verses: Vec<VerseLine>,
}

pub struct RemoteSource {
    client: Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SourceError::Unavailable(format!(
                "base URL '{base_url}' is not an http(s) URL"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lectern/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Unavailable(describe(&e)))?;
        Ok(Self { client, base_url })
    }

    /// `None` for a non-canonical book or a code that is not alphanumeric.
    /// Such a passage is never requested.
    fn verse_url(&self, reference: &Reference, translation: &Translation) -> Option<String> {
        let path = passage_path(reference)?;
        let code = translation.code();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(format!("{}/{}/{}", self.base_url, code, path))
    }

    /// GET a JSON body. `Ok(None)` on 404.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, SourceError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| SourceError::Unavailable(describe(&e)))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<T>()
                .map(Some)
                .map_err(|e| SourceError::Unavailable(describe(&e))),
            status => Err(SourceError::Unavailable(format!(
                "{url} answered {status}"
            ))),
        }
    }
}

impl ScriptureSource for RemoteSource {
    fn fetch_verse(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<Verse, SourceError> {
        let not_found = || SourceError::NotFound(format!("{reference} ({translation})"));
        let url = self.verse_url(reference, translation).ok_or_else(not_found)?;
        let body: VerseBody = self.get_json(&url)?.ok_or_else(not_found)?;
        Ok(Verse {
            reference: reference.to_string(),
            translation: translation.clone(),
            text: body.text,
            context: body.context.filter(|c| !c.trim().is_empty()),
            cross_references: body.cross_references,
        })
    }

    fn fetch_chapter(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<Chapter, SourceError> {
        let chapter = reference.chapter_reference();
        let not_found = || SourceError::NotFound(format!("{chapter} ({translation})"));
        let url = self.verse_url(&chapter, translation).ok_or_else(not_found)?;
        let mut body: ChapterBody = self.get_json(&url)?.ok_or_else(not_found)?;
        body.verses.sort_by_key(|v| v.number);
        Ok(Chapter {
            reference: chapter.to_string(),
            translation: translation.clone(),
            verses: body.verses,
        })
    }

    fn fetch_commentary(&self, reference: &Reference) -> Result<Vec<Commentary>, SourceError> {
        let Some(path) = passage_path(reference) else {
            return Ok(Vec::new());
        };
        let url = format!("{}/commentary/{}", self.base_url, path);
        Ok(self.get_json(&url)?.unwrap_or_default())
    }
}

/// `john/3/16` or `john/3`. Only canonical books have a path.
fn passage_path(reference: &Reference) -> Option<String> {
    let slug = reference.canonical_book()?.slug();
    Some(match reference.verse() {
        Some(v) => format!("{}/{}/{}", slug, reference.chapter(), v),
        None => format!("{}/{}", slug, reference.chapter()),
    })
}

/// A readable reason for a failed request.
fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "the scripture service timed out".to_string()
    } else if err.is_connect() {
        "could not connect to the scripture service".to_string()
    } else if err.is_decode() {
        "the scripture service sent an unexpected response format".to_string()
    } else {
        format!("request to the scripture service failed: {err}")
    }
}
