use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::models::{BaseIdentifier, PageLocation};

fn separator_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[-_]+").expect("invalid separator regex"))
}

fn whitespace_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

/// Derive the base identifier from a location path.
///
/// Only the final path segment is considered. It is percent-decoded and its last extension is
/// removed, so `archive.tar.gz` becomes `archive.tar`. Paths without a usable segment (the site
/// root, a directory, or a dot file) resolve to [`BaseIdentifier::default`].
pub fn resolve_base(location_path: &str) -> BaseIdentifier {
    let path = strip_query_and_fragment(location_path);
    let segment = path.rsplit('/').next().unwrap_or_default();
    let decoded = percent_decode_str(segment).decode_utf8_lossy();

    let stem = match decoded.rfind('.') {
        Some(index) => &decoded[..index],
        None => &*decoded,
    };

    if stem.is_empty() {
        BaseIdentifier::default()
    } else {
        BaseIdentifier::new(stem)
    }
}

/// Split a location path into its directory prefix and base identifier.
pub fn resolve_location(location_path: &str) -> PageLocation {
    let path = strip_query_and_fragment(location_path);
    let dir = match path.rfind('/') {
        Some(index) => path[..=index].to_string(),
        None => String::new(),
    };

    PageLocation {
        dir,
        base: resolve_base(path),
    }
}

/// Turn an identifier such as `river_walk-notes` into a display title (`River Walk Notes`).
///
/// Only the first character of each word is uppercased; the remainder is kept as written so
/// acronyms and mixed case survive.
pub fn title_from_identifier(id: &str) -> String {
    let spaced = separator_runs().replace_all(id, " ");
    let collapsed = whitespace_runs().replace_all(&spaced, " ");

    collapsed
        .trim()
        .split(' ')
        .map(capitalise_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalise_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn strip_query_and_fragment(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(index) => &path[..index],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_final_extension_only() {
        assert_eq!(resolve_base("/pages/river-walk.html").as_str(), "river-walk");
        assert_eq!(resolve_base("/pages/archive.tar.gz").as_str(), "archive.tar");
        assert_eq!(resolve_base("notes").as_str(), "notes");
    }

    #[test]
    fn decodes_percent_escapes() {
        assert_eq!(resolve_base("/a/My%20Page.html").as_str(), "My Page");
    }

    #[test]
    fn falls_back_for_root_and_directories() {
        assert_eq!(resolve_base("/").as_str(), "index");
        assert_eq!(resolve_base("/docs/").as_str(), "index");
        assert_eq!(resolve_base("").as_str(), "index");
        assert_eq!(resolve_base("/docs/.hidden").as_str(), "index");
    }

    #[test]
    fn ignores_query_and_fragment() {
        assert_eq!(resolve_base("/a/page.html?x=1.2#top").as_str(), "page");
    }

    #[test]
    fn location_keeps_directory_prefix() {
        let location = resolve_location("/guides/intro.html");
        assert_eq!(location.dir, "/guides/");
        assert_eq!(location.base.as_str(), "intro");

        let bare = resolve_location("intro.html");
        assert_eq!(bare.dir, "");
        assert_eq!(bare.base.as_str(), "intro");
    }

    #[test]
    fn titles_replace_separators_and_capitalise_words() {
        assert_eq!(title_from_identifier("river_walk--notes"), "River Walk Notes");
        assert_eq!(title_from_identifier("  the  NASA_files "), "The NASA Files");
        assert_eq!(title_from_identifier("iPhone-tips"), "IPhone Tips");
    }

    #[test]
    fn titles_are_idempotent() {
        for id in ["river_walk", "a--b__c", "  spaced   out ", "ünïcode-wörds", "x", ""] {
            let once = title_from_identifier(id);
            assert_eq!(title_from_identifier(&once), once, "input {id:?}");
        }
    }
}
