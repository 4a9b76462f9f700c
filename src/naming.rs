//! The `NNN-name` filename convention.
//!
//! Topic files and markdown pages share one naming pattern: an optional
//! numeric prefix (`NNN-`) followed by a name. The number orders entries in
//! navigation; entries without one are built but left out of navigation.
//!
//! - `010-judaism.toml` → number 10, slug `judaism`, title "judaism"
//! - `020-early-church.toml` → number 20, slug `early-church`, title "early church"
//! - `drafts.toml` → no number, slug `drafts`

/// A file stem split into its ordering number and its name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    pub number: Option<u32>,
    /// Name after the prefix, dashes kept. Used as the URL slug.
    pub slug: String,
    /// Name with dashes turned into spaces.
    pub display_title: String,
}

impl ParsedName {
    pub fn in_nav(&self) -> bool {
        self.number.is_some()
    }

    /// Sort key: the number, or after every numbered entry.
    pub fn sort_key(&self) -> u32 {
        self.number.unwrap_or(u32::MAX)
    }
}

pub fn parse_entry_name(stem: &str) -> ParsedName {
    let (number, rest) = match stem.split_once('-') {
        Some((prefix, rest)) if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) => {
            (prefix.parse::<u32>().ok(), rest)
        }
        _ => match stem.parse::<u32>() {
            Ok(n) => (Some(n), ""),
            Err(_) => (None, stem),
        },
    };
    // A prefix too large for u32 is treated as part of the name.
    let rest = if number.is_none() { stem } else { rest };
    ParsedName {
        number,
        slug: rest.to_string(),
        display_title: rest.replace('-', " "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_topic() {
        let p = parse_entry_name("010-judaism");
        assert_eq!(p.number, Some(10));
        assert_eq!(p.slug, "judaism");
        assert!(p.in_nav());
    }

    #[test]
    fn dashes_become_spaces_in_title_only() {
        let p = parse_entry_name("020-early-church");
        assert_eq!(p.slug, "early-church");
        assert_eq!(p.display_title, "early church");
    }

    #[test]
    fn unnumbered_is_hidden_and_sorts_last() {
        let p = parse_entry_name("drafts");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "drafts");
        assert!(!p.in_nav());
        assert_eq!(p.sort_key(), u32::MAX);
    }

    #[test]
    fn unnumbered_with_dashes_keeps_whole_stem() {
        let p = parse_entry_name("wip-notes");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "wip-notes");
        assert_eq!(p.display_title, "wip notes");
    }

    #[test]
    fn number_only() {
        let p = parse_entry_name("005");
        assert_eq!(p.number, Some(5));
        assert_eq!(p.slug, "");
    }

    #[test]
    fn oversized_prefix_is_part_of_name() {
        let p = parse_entry_name("99999999999-big");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "99999999999-big");
    }
}
