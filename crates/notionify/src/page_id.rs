//! Page ID Parsing
//!
//! Turns a Notion URL, a bare 32-hex ID or a dashed UUID into the canonical
//! dashed lowercase form.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{NotionError, Result};

// Dashed form first so a dashed ID is not matched as a shorter hex run.
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}|[0-9a-f]{32}")
        .expect("page id pattern is valid")
});

// A full 32-hex run closing a path segment, as in `.../Title-<id>?v=...`.
static SEGMENT_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^0-9a-f])([0-9a-f]{32})(?:$|[?#/])")
        .expect("segment id pattern is valid")
});

/// Extract the page ID from a URL or ID string.
///
/// A 32-hex run that ends a path segment is preferred, so a title slug made of
/// hex-looking words cannot shadow the ID. For
/// `https://www.notion.so/ws/Title-<id>?v=<view>` the page ID is returned and
/// the view ID is ignored. Otherwise the first ID-shaped run wins.
pub fn extract_page_id(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(NotionError::config("page reference is empty"));
    }

    if let Some(id) = SEGMENT_ID_PATTERN.captures(input).and_then(|c| c.get(1)) {
        return Ok(canonicalize(id.as_str()));
    }

    let found = ID_PATTERN
        .find(input)
        .ok_or_else(|| NotionError::config(format!("no page ID found in '{}'", input)))?;

    Ok(canonicalize(found.as_str()))
}

fn canonicalize(raw: &str) -> String {
    let hex: String = raw
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "1429989f-e8ac-4eff-bc8f-57f56486db54";

    #[test]
    fn test_bare_id() {
        assert_eq!(
            extract_page_id("1429989fe8ac4effbc8f57f56486db54").unwrap(),
            CANONICAL
        );
    }

    #[test]
    fn test_dashed_id_uppercase() {
        assert_eq!(
            extract_page_id("1429989F-E8AC-4EFF-BC8F-57F56486DB54").unwrap(),
            CANONICAL
        );
    }

    #[test]
    fn test_url_with_title_and_view() {
        let url = "https://www.notion.so/myspace/Reading-List-1429989fe8ac4effbc8f57f56486db54?v=0123456789abcdef0123456789abcdef";
        assert_eq!(extract_page_id(url).unwrap(), CANONICAL);
    }

    #[test]
    fn test_hex_words_in_title_do_not_shadow_id() {
        let url = "https://www.notion.so/ws/deadbeef-cafe-babe-face-1429989fe8ac4effbc8f57f56486db54";
        assert_eq!(extract_page_id(url).unwrap(), CANONICAL);

        let url = "https://www.notion.so/ws/deadbeef-cafe-babe-face-1429989fe8ac4effbc8f57f56486db54#heading";
        assert_eq!(extract_page_id(url).unwrap(), CANONICAL);
    }

    #[test]
    fn test_dashed_id_in_url() {
        let url = "https://www.notion.so/1429989f-e8ac-4eff-bc8f-57f56486db54";
        assert_eq!(extract_page_id(url).unwrap(), CANONICAL);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = extract_page_id("https://www.notion.so/not-a-page").unwrap_err();
        assert!(matches!(err, NotionError::Config(_)));

        let err = extract_page_id("   ").unwrap_err();
        assert!(matches!(err, NotionError::Config(_)));
    }
}
