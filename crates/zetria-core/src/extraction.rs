//! Inline `#tag` and `[[link]]` extraction from note content.
//!
//! Tags follow the `#word` convention where a word is any run of Unicode
//! word characters (letters, digits, underscore). Links use the wiki-style
//! `[[Target title]]` syntax.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#(\w+)").expect("tag pattern is valid"));

static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("link pattern is valid"));

/// Extract hashtags from note content.
///
/// Returns deduplicated tag names (without the leading `#`) in sorted order.
/// Case is preserved, so `#Rust` and `#rust` are distinct tags.
///
/// # Examples
///
/// ```
/// use zetria_core::extract_tags;
///
/// let tags = extract_tags("Learning #rust and #sql, more #rust later");
/// assert_eq!(tags, vec!["rust".to_string(), "sql".to_string()]);
/// ```
pub fn extract_tags(content: &str) -> Vec<String> {
    TAG_PATTERN
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Extract `[[link]]` targets from note content.
///
/// Targets are trimmed; empty targets are dropped. The result is
/// deduplicated and sorted.
///
/// # Examples
///
/// ```
/// use zetria_core::extract_links;
///
/// let links = extract_links("See [[Ownership]] and [[ Borrowing ]]");
/// assert_eq!(links, vec!["Borrowing".to_string(), "Ownership".to_string()]);
/// ```
pub fn extract_links(content: &str) -> Vec<String> {
    LINK_PATTERN
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|target| !target.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tags_deduplicates() {
        let tags = extract_tags("#a #b #a #b #c");
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extract_tags_is_case_sensitive() {
        let tags = extract_tags("#Rust #rust");
        assert_eq!(tags, vec!["Rust", "rust"]);
    }

    #[test]
    fn test_extract_tags_unicode_words() {
        let tags = extract_tags("Estudo de #programação e #lógica_formal");
        assert_eq!(tags, vec!["lógica_formal", "programação"]);
    }

    #[test]
    fn test_extract_tags_stops_at_punctuation() {
        let tags = extract_tags("tags: #one, #two. #three-four");
        assert_eq!(tags, vec!["one", "three", "two"]);
    }

    #[test]
    fn test_markdown_heading_is_not_a_tag() {
        let tags = extract_tags("# Heading\n## Sub heading\nbody");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_numeric_tags_are_kept() {
        assert_eq!(extract_tags("issue #42"), vec!["42"]);
    }

    #[test]
    fn test_extract_tags_empty_content() {
        assert!(extract_tags("").is_empty());
        assert!(extract_tags("no tags here").is_empty());
    }

    #[test]
    fn test_extract_links_basic() {
        let links = extract_links("[[Note A]] points to [[Note B]]");
        assert_eq!(links, vec!["Note A", "Note B"]);
    }

    #[test]
    fn test_extract_links_deduplicates_after_trim() {
        let links = extract_links("[[Alpha]] and [[ Alpha ]]");
        assert_eq!(links, vec!["Alpha"]);
    }

    #[test]
    fn test_extract_links_ignores_empty_and_unclosed() {
        let links = extract_links("[[ ]] [[open and [single]");
        assert!(links.is_empty());
    }

    #[test]
    fn test_link_text_does_not_leak_tags() {
        let content = "[[Rust notes]] #rust";
        assert_eq!(extract_tags(content), vec!["rust"]);
        assert_eq!(extract_links(content), vec!["Rust notes"]);
    }
}
