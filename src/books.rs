//! Canonical book names and the abbreviations readers actually type.
//!
//! Book lookup is case-insensitive and ignores periods and repeated spaces,
//! so `"gen"`, `"Gen."` and `"GENESIS"` all resolve to `Genesis`. Numbered
//! books accept Arabic or Roman prefixes: `"1 Cor"`, `"1Cor"`, `"I Corinthians"`.

/// A canonical book entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    pub name: &'static str,
    /// Lowercased alternate spellings, without periods.
    pub aliases: &'static [&'static str],
}

impl Book {
    /// True for the five books of Moses.
    pub fn is_torah(&self) -> bool {
        TORAH.contains(&self.name)
    }

    /// URL path segment, e.g. `song-of-solomon`, `1-john`.
    pub fn slug(&self) -> String {
        slugify(self.name)
    }
}

/// The five books of Moses, in canonical order.
pub const TORAH: &[&str] = &["Genesis", "Exodus", "Leviticus", "Numbers", "Deuteronomy"];

macro_rules! book {
    ($name:literal, [$($alias:literal),*]) => {
        Book { name: $name, aliases: &[$($alias),*] }
    };
}

pub const BOOKS: &[Book] = &[
    book!("Genesis", ["gen", "ge", "gn"]),
    book!("Exodus", ["exod", "exo", "ex"]),
    book!("Leviticus", ["lev", "le", "lv"]),
    book!("Numbers", ["num", "nu", "nm", "nb"]),
    book!("Deuteronomy", ["deut", "de", "dt"]),
    book!("Joshua", ["josh", "jos", "jsh"]),
    book!("Judges", ["judg", "jdg", "jg"]),
    book!("Ruth", ["rth", "ru"]),
    book!("1 Samuel", ["1 sam", "1 sa", "1sam"]),
    book!("2 Samuel", ["2 sam", "2 sa", "2sam"]),
    book!("1 Kings", ["1 kgs", "1 ki", "1kgs"]),
    book!("2 Kings", ["2 kgs", "2 ki", "2kgs"]),
    book!("1 Chronicles", ["1 chron", "1 chr", "1 ch"]),
    book!("2 Chronicles", ["2 chron", "2 chr", "2 ch"]),
    book!("Ezra", ["ezr"]),
    book!("Nehemiah", ["neh", "ne"]),
    book!("Esther", ["esth", "est", "es"]),
    book!("Job", ["jb"]),
    book!("Psalms", ["psalm", "ps", "psa", "pss"]),
    book!("Proverbs", ["prov", "pro", "prv", "pr"]),
    book!("Ecclesiastes", ["eccles", "eccl", "ecc", "qoh"]),
    book!("Song of Solomon", ["song", "song of songs", "sos", "canticles"]),
    book!("Isaiah", ["isa", "is"]),
    book!("Jeremiah", ["jer", "je", "jr"]),
    book!("Lamentations", ["lam", "la"]),
    book!("Ezekiel", ["ezek", "eze", "ezk"]),
    book!("Daniel", ["dan", "da", "dn"]),
    book!("Hosea", ["hos", "ho"]),
    book!("Joel", ["jl"]),
    book!("Amos", ["am"]),
    book!("Obadiah", ["obad", "ob"]),
    book!("Jonah", ["jnh", "jon"]),
    book!("Micah", ["mic", "mc"]),
    book!("Nahum", ["nah", "na"]),
    book!("Habakkuk", ["hab", "hb"]),
    book!("Zephaniah", ["zeph", "zep", "zp"]),
    book!("Haggai", ["hag", "hg"]),
    book!("Zechariah", ["zech", "zec", "zc"]),
    book!("Malachi", ["mal", "ml"]),
    book!("Matthew", ["matt", "mat", "mt"]),
    book!("Mark", ["mrk", "mar", "mk", "mr"]),
    book!("Luke", ["luk", "lk"]),
    book!("John", ["joh", "jhn", "jn"]),
    book!("Acts", ["act", "ac"]),
    book!("Romans", ["rom", "ro", "rm"]),
    book!("1 Corinthians", ["1 cor", "1 co", "1cor"]),
    book!("2 Corinthians", ["2 cor", "2 co", "2cor"]),
    book!("Galatians", ["gal", "ga"]),
    book!("Ephesians", ["eph", "ephes"]),
    book!("Philippians", ["phil", "php", "pp"]),
    book!("Colossians", ["col", "co"]),
    book!("1 Thessalonians", ["1 thess", "1 thes", "1 th"]),
    book!("2 Thessalonians", ["2 thess", "2 thes", "2 th"]),
    book!("1 Timothy", ["1 tim", "1 ti", "1tim"]),
    book!("2 Timothy", ["2 tim", "2 ti", "2tim"]),
    book!("Titus", ["tit", "ti"]),
    book!("Philemon", ["philem", "phm", "pm"]),
    book!("Hebrews", ["heb"]),
    book!("James", ["jas", "jm"]),
    book!("1 Peter", ["1 pet", "1 pe", "1pet"]),
    book!("2 Peter", ["2 pet", "2 pe", "2pet"]),
    book!("1 John", ["1 jn", "1 jhn", "1jn"]),
    book!("2 John", ["2 jn", "2 jhn", "2jn"]),
    book!("3 John", ["3 jn", "3 jhn", "3jn"]),
    book!("Jude", ["jud", "jd"]),
    book!("Revelation", ["rev", "re", "revelations"]),
];

/// Look up a book by name or abbreviation.
pub fn find_book(name: &str) -> Option<&'static Book> {
    let key = normalize(name);
    if key.is_empty() {
        return None;
    }
    BOOKS.iter().find(|b| {
        normalize(b.name) == key || b.aliases.iter().any(|a| normalize(a) == key)
    })
}

/// Lowercase, drop periods, collapse whitespace, and turn a leading Roman
/// numeral (`i`, `ii`, `iii`) into its digit. A digit glued to the name
/// (`1cor`) is split off so it matches `1 cor`.
fn normalize(name: &str) -> String {
    let cleaned = name.replace('.', " ").to_lowercase();
    let mut words: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
    let count = words.len();
    if let Some(first) = words.first_mut() {
        match first.as_str() {
            "i" if count > 1 => *first = "1".to_string(),
            "ii" => *first = "2".to_string(),
            "iii" => *first = "3".to_string(),
            _ => {}
        }
    }
    if let Some(first) = words.first().cloned() {
        let mut chars = first.chars();
        if let Some(d) = chars.next()
            && d.is_ascii_digit()
            && first.len() > 1
            && chars.clone().all(|c| c.is_alphabetic())
        {
            words[0] = chars.collect();
            words.insert(0, d.to_string());
        }
    }
    words.join(" ")
}

/// Lowercase a display name into a URL path segment.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
