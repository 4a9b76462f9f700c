//! Scripture resolution.
//!
//! Stage 2 of the build pipeline. Takes the manifest from the scan stage,
//! expands the configured routes, and looks up every passage the site needs
//! through a [`ScriptureService`]. The result is a [`ResolvedSite`]: the scan
//! manifest plus all text, ready to render without touching the source again.
//!
//! ## Pages
//!
//! - **Chapter route**: the chapter in the default translation.
//! - **Verse route**: the verse in the default translation, its parallel set
//!   across `translations.parallel`, and its commentary. The three lookups
//!   run concurrently and fail independently.
//! - **Topic passages**: each passage quoted under a topic entry, in the
//!   default translation.
//!
//! ## Failure handling
//!
//! A route whose primary text does not resolve is recorded in
//! [`ResolvedSite::skipped`] and the build goes on. A missing parallel
//! translation is shown as unavailable on the page. A topic passage that
//! fails resolves to `None` and renders as unavailable.
//!
//! ## Parallel Processing
//!
//! Routes resolve in parallel on the rayon pool. Progress is reported per
//! route through an optional [`ResolveEvent`] channel.

use crate::config::SiteConfig;
use crate::reference::{Reference, ReferenceError, Translation};
use crate::routes::{self, Route};
use crate::scan::Manifest;
use crate::scripture::{Chapter, Commentary, ParallelSet, Verse};
use crate::service::{Canon, ScriptureError, ScriptureService};
use crate::source::{self, ScriptureSource, SourceError};
use crate::types::{NavItem, Page, Topic};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Scripture source error: {0}")]
    Source(#[from] SourceError),
    #[error("Invalid route: {0}")]
    Route(#[from] ReferenceError),
}

/// Progress reported while resolving.
#[derive(Debug, Clone)]
pub enum ResolveEvent {
    RoutesStarted {
        count: usize,
    },
    ChapterResolved {
        path: String,
        reference: String,
        verses: usize,
    },
    VerseResolved {
        path: String,
        reference: String,
        /// Parallel translations that came back.
        translations: usize,
        commentary: usize,
    },
    RouteSkipped {
        path: String,
        reference: String,
        reason: String,
    },
    TopicResolved {
        title: String,
        passages: usize,
        unavailable: usize,
    },
}

/// A passage quoted on a topic page. `text` is `None` when the lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub reference: String,
    pub translation: Translation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTopic {
    #[serde(flatten)]
    pub topic: Topic,
    /// One list per entry, same order as `topic.entries`.
    pub quotes: Vec<Vec<Quote>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScriptureContent {
    Chapter {
        chapter: Chapter,
    },
    Verse {
        verse: Verse,
        parallel: ParallelSet,
        #[serde(default)]
        commentary: Vec<Commentary>,
    },
}

/// A scripture route with its text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScripturePage {
    pub path: String,
    pub reference: Reference,
    #[serde(flatten)]
    pub content: ScriptureContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRoute {
    pub path: String,
    pub reference: Reference,
    pub reason: String,
}

/// Manifest output from the resolve stage
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolvedSite {
    pub navigation: Vec<NavItem>,
    pub topics: Vec<ResolvedTopic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    pub scripture: Vec<ScripturePage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRoute>,
    pub config: SiteConfig,
}

/// Resolve a scan manifest against the source named in its config.
pub fn resolve(
    manifest_path: &Path,
    source_root: &Path,
    canon: Canon,
    events: Option<Sender<ResolveEvent>>,
) -> Result<ResolvedSite, ResolveError> {
    let content = std::fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&content)?;
    let source = source::open_source(&manifest.config.source, source_root)?;
    resolve_with_source(source.as_ref(), manifest, canon, events)
}

/// Resolve using a specific source (allows testing with mock).
pub fn resolve_with_source(
    source: &dyn ScriptureSource,
    manifest: Manifest,
    canon: Canon,
    events: Option<Sender<ResolveEvent>>,
) -> Result<ResolvedSite, ResolveError> {
    let config = &manifest.config;
    let service = ScriptureService::new(source, &config.translations).with_canon(canon);
    let primary = Translation::new(&config.translations.default);
    let parallel: Vec<Translation> = config
        .translations
        .parallel
        .iter()
        .map(|c| Translation::new(c))
        .collect();

    let routes = routes::enumerate(&config.routes)?;
    emit(&events, ResolveEvent::RoutesStarted { count: routes.len() });
    debug!("resolving {} routes with {primary} as primary", routes.len());

    let results: Vec<Result<ScripturePage, SkippedRoute>> = routes
        .into_par_iter()
        .map(|route| {
            let result = resolve_route(&service, route, &primary, &parallel);
            emit(&events, route_event(&result));
            result
        })
        .collect();

    let mut scripture = Vec::new();
    let mut skipped = Vec::new();
    for result in results {
        match result {
            Ok(page) => scripture.push(page),
            Err(skip) => skipped.push(skip),
        }
    }

    let topics: Vec<ResolvedTopic> = manifest
        .topics
        .into_par_iter()
        .map(|topic| {
            let resolved = resolve_topic(&service, topic, &primary);
            let (passages, unavailable) = quote_counts(&resolved.quotes);
            emit(
                &events,
                ResolveEvent::TopicResolved {
                    title: resolved.topic.title.clone(),
                    passages,
                    unavailable,
                },
            );
            resolved
        })
        .collect();

    Ok(ResolvedSite {
        navigation: manifest.navigation,
        topics,
        pages: manifest.pages,
        scripture,
        skipped,
        config: manifest.config,
    })
}

fn resolve_route(
    service: &ScriptureService<'_>,
    route: Route,
    primary: &Translation,
    parallel: &[Translation],
) -> Result<ScripturePage, SkippedRoute> {
    let content = if route.is_chapter() {
        service
            .chapter(&route.reference, primary)
            .map(|chapter| ScriptureContent::Chapter { chapter })
    } else {
        let ((verse, set), commentary) = rayon::join(
            || {
                rayon::join(
                    || service.verse(&route.reference, primary),
                    || service.parallel(&route.reference, parallel),
                )
            },
            || service.commentary(&route.reference),
        );
        verse.map(|verse| ScriptureContent::Verse {
            verse,
            parallel: set,
            commentary: commentary.unwrap_or_else(|e| {
                warn!("no commentary for {}: {e}", route.reference);
                Vec::new()
            }),
        })
    };

    match content {
        Ok(content) => Ok(ScripturePage {
            path: route.path,
            reference: route.reference,
            content,
        }),
        Err(e) => Err(SkippedRoute {
            path: route.path,
            reference: route.reference,
            reason: e.to_string(),
        }),
    }
}

fn resolve_topic(
    service: &ScriptureService<'_>,
    topic: Topic,
    primary: &Translation,
) -> ResolvedTopic {
    let quotes = topic
        .entries
        .iter()
        .map(|entry| {
            entry
                .passages
                .iter()
                .map(|passage| Quote {
                    reference: passage.to_string(),
                    translation: primary.clone(),
                    text: match passage_text(service, passage, primary) {
                        Ok(text) => Some(text),
                        Err(e) => {
                            warn!("{} quotes {passage}, unavailable: {e}", topic.title);
                            None
                        }
                    },
                })
                .collect()
        })
        .collect();
    ResolvedTopic { topic, quotes }
}

/// A verse's text, or a whole chapter's verses joined.
fn passage_text(
    service: &ScriptureService<'_>,
    passage: &Reference,
    translation: &Translation,
) -> Result<String, ScriptureError> {
    match passage.verse() {
        Some(_) => service.verse(passage, translation).map(|v| v.text),
        None => service.chapter(passage, translation).map(|c| {
            c.verses
                .iter()
                .map(|line| line.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        }),
    }
}

fn quote_counts(quotes: &[Vec<Quote>]) -> (usize, usize) {
    let all = quotes.iter().flatten();
    let total = all.clone().count();
    let unavailable = all.filter(|q| q.text.is_none()).count();
    (total, unavailable)
}

fn route_event(result: &Result<ScripturePage, SkippedRoute>) -> ResolveEvent {
    match result {
        Ok(page) => match &page.content {
            ScriptureContent::Chapter { chapter } => ResolveEvent::ChapterResolved {
                path: page.path.clone(),
                reference: page.reference.to_string(),
                verses: chapter.verses.len(),
            },
            ScriptureContent::Verse {
                parallel,
                commentary,
                ..
            } => ResolveEvent::VerseResolved {
                path: page.path.clone(),
                reference: page.reference.to_string(),
                translations: parallel.len(),
                commentary: commentary.len(),
            },
        },
        Err(skip) => ResolveEvent::RouteSkipped {
            path: skip.path.clone(),
            reference: skip.reference.to_string(),
            reason: skip.reason.clone(),
        },
    }
}

fn emit(events: &Option<Sender<ResolveEvent>>, event: ResolveEvent) {
    if let Some(tx) = events {
        // Receiver gone means nobody is printing; resolution still matters.
        tx.send(event).ok();
    }
}
