//! Scripture dataset on disk.
//!
//! ```text
//! scripture/
//! ├── translations/
//! │   ├── NIV.json           # {"name": "...", "books": {"John": {"3": {"16": "..."}}}}
//! │   └── KJV.json
//! ├── commentary.json        # {"John 3:16": [{"author", "source", "text", "date"?}]}
//! └── cross_references.json  # {"John 3:16": [{"reference": "Romans 5:8", "preview"?}]}
//! ```
//!
//! The translation code is the file stem, upper-cased. Book names and
//! reference keys are normalized on load, so the dataset may use
//! abbreviations. Both JSON side files are optional.
//!
//! Everything is read once in [`LocalSource::open`]; lookups are pure map
//! reads.

use super::{ScriptureSource, SourceError};
use crate::reference::{Reference, Translation};
use crate::scripture::{Chapter, Commentary, CrossReference, Verse, VerseLine};
use log::debug;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

type Books = HashMap<String, BTreeMap<u32, BTreeMap<u32, String>>>;

#[derive(Deserialize)]
struct TranslationFile {
    #[serde(default)]
    name: String,
    books: BTreeMap<String, BTreeMap<u32, BTreeMap<u32, String>>>,
}

#[derive(Deserialize)]
struct CrossReferenceEntry {
    reference: String,
    #[serde(default)]
    preview: Option<String>,
}

pub struct LocalSource {
    translations: HashMap<Translation, Books>,
    commentary: HashMap<String, Vec<Commentary>>,
    cross_references: HashMap<String, Vec<(Reference, Option<String>)>>,
}

impl LocalSource {
    pub fn open(dir: &Path) -> Result<Self, SourceError> {
        let translations_dir = dir.join("translations");
        if !translations_dir.is_dir() {
            return Err(SourceError::Dataset(format!(
                "{} has no translations/ directory",
                dir.display()
            )));
        }

        let mut files: Vec<_> = fs::read_dir(&translations_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .map(|e| e.eq_ignore_ascii_case("json"))
                        .unwrap_or(false)
            })
            .collect();
        files.sort();

        let mut translations = HashMap::new();
        for path in files {
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let code = Translation::new(&stem.to_string_lossy());
            let file: TranslationFile = read_json(&path)?;
            let mut books: Books = HashMap::new();
            for (book, chapters) in file.books {
                let canonical = canonical_book(&book)?;
                books.entry(canonical).or_default().extend(chapters);
            }
            debug!(
                "loaded {} ({}) with {} books",
                code,
                if file.name.is_empty() { "unnamed" } else { file.name.as_str() },
                books.len()
            );
            translations.insert(code, books);
        }

        let commentary = match read_optional::<BTreeMap<String, Vec<Commentary>>>(
            &dir.join("commentary.json"),
        )? {
            Some(raw) => {
                let mut map: HashMap<String, Vec<Commentary>> = HashMap::new();
                for (key, entries) in raw {
                    map.entry(normalize_key(&key)?).or_default().extend(entries);
                }
                map
            }
            None => HashMap::new(),
        };

        let cross_references = match read_optional::<BTreeMap<String, Vec<CrossReferenceEntry>>>(
            &dir.join("cross_references.json"),
        )? {
            Some(raw) => {
                let mut map: HashMap<String, Vec<(Reference, Option<String>)>> = HashMap::new();
                for (key, entries) in raw {
                    let targets = entries
                        .into_iter()
                        .map(|e| Ok((parse_key(&e.reference)?, e.preview)))
                        .collect::<Result<Vec<_>, SourceError>>()?;
                    map.entry(normalize_key(&key)?).or_default().extend(targets);
                }
                map
            }
            None => HashMap::new(),
        };

        Ok(Self {
            translations,
            commentary,
            cross_references,
        })
    }

    /// Translation codes present in the dataset, sorted.
    pub fn translations(&self) -> Vec<&Translation> {
        let mut codes: Vec<_> = self.translations.keys().collect();
        codes.sort();
        codes
    }

    fn chapter_verses(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<&BTreeMap<u32, String>, SourceError> {
        let not_found = || SourceError::NotFound(format!("{reference} ({translation})"));
        self.translations
            .get(translation)
            .ok_or_else(not_found)?
            .get(reference.book())
            .ok_or_else(not_found)?
            .get(&reference.chapter())
            .ok_or_else(not_found)
    }

    fn lookup_text(&self, reference: &Reference, translation: &Translation) -> Option<&str> {
        let verse = reference.verse()?;
        self.chapter_verses(reference, translation)
            .ok()?
            .get(&verse)
            .map(String::as_str)
    }
}

impl ScriptureSource for LocalSource {
    fn fetch_verse(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<Verse, SourceError> {
        let verses = self.chapter_verses(reference, translation)?;
        let number = reference
            .verse()
            .ok_or_else(|| SourceError::NotFound(format!("{reference} ({translation})")))?;
        let text = verses
            .get(&number)
            .ok_or_else(|| SourceError::NotFound(format!("{reference} ({translation})")))?;

        let neighbours: Vec<String> = [number.checked_sub(1), number.checked_add(1)]
            .into_iter()
            .flatten()
            .filter_map(|n| verses.get(&n).map(|t| format!("{n} {t}")))
            .collect();
        let context = (!neighbours.is_empty()).then(|| neighbours.join("\n"));

        let cross_references = self
            .cross_references
            .get(&reference.to_string())
            .map(|targets| {
                targets
                    .iter()
                    .map(|(target, preview)| CrossReference {
                        reference: target.clone(),
                        preview: preview
                            .clone()
                            .or_else(|| {
                                self.lookup_text(target, translation).map(str::to_string)
                            })
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Verse {
            reference: reference.to_string(),
            translation: translation.clone(),
            text: text.clone(),
            context,
            cross_references,
        })
    }

    fn fetch_chapter(
        &self,
        reference: &Reference,
        translation: &Translation,
    ) -> Result<Chapter, SourceError> {
        let chapter = reference.chapter_reference();
        let verses = self.chapter_verses(&chapter, translation)?;
        Ok(Chapter {
            reference: chapter.to_string(),
            translation: translation.clone(),
            verses: verses
                .iter()
                .map(|(&number, text)| VerseLine {
                    number,
                    text: text.clone(),
                })
                .collect(),
        })
    }

    fn fetch_commentary(&self, reference: &Reference) -> Result<Vec<Commentary>, SourceError> {
        Ok(self
            .commentary
            .get(&reference.to_string())
            .cloned()
            .unwrap_or_default())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SourceError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| SourceError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn read_optional<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, SourceError> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

fn parse_key(key: &str) -> Result<Reference, SourceError> {
    Reference::parse(key).map_err(|e| SourceError::Dataset(e.to_string()))
}

fn normalize_key(key: &str) -> Result<String, SourceError> {
    parse_key(key).map(|r| r.to_string())
}

fn canonical_book(name: &str) -> Result<String, SourceError> {
    Reference::new(name, 1, None)
        .map(|r| r.book().to_string())
        .map_err(|e| SourceError::Dataset(e.to_string()))
}
