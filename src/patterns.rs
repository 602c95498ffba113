//! Compiled regex patterns for URL cleaning and inline-style matching.
//!
//! All patterns are compiled once at startup using `LazyLock`. The URL
//! cleaning sequence is ordered: scale-variant path segments may only become
//! visible after an earlier pattern removes an enclosing query string, so the
//! list must be applied front to back.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// URL Cleaning Patterns
// =============================================================================

/// Ordered cleaning patterns applied to every asset URL: cache breakers,
/// format/size query parameters, then CDN revision and scale-variant path
/// segments.
pub static URL_CLEANING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\?cb=\d+",                  // Cache breaker
        r"\?format=\w+",              // Format parameter
        r"\?width=\d+",               // Width parameter
        r"\?height=\d+",              // Height parameter
        r"/revision/\w+",             // Revision paths
        r"/scale-to-width-down/\d+",  // Scale down
        r"/scale-to-width/\d+",       // Scale to width
        r"/scale-to-height/\d+",      // Scale to height
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("URL_CLEANING regex"))
    .collect()
});

// =============================================================================
// Inline Style Patterns
// =============================================================================

/// Matches either hiding declaration inside an inline style.
pub static HIDING_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"display:\s*none|visibility:\s*hidden").expect("HIDING_STYLE regex")
});

/// Matches a `display: none` declaration for in-place replacement.
pub static DISPLAY_NONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"display:\s*none").expect("DISPLAY_NONE regex"));

/// Matches a `visibility: hidden` declaration for in-place replacement.
pub static VISIBILITY_HIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"visibility:\s*hidden").expect("VISIBILITY_HIDDEN regex"));

// =============================================================================
// Filename Patterns
// =============================================================================

/// Characters that are illegal in filenames on common filesystems.
pub static ILLEGAL_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("ILLEGAL_FILENAME_CHARS regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_cleaning_strips_cache_breaker() {
        let mut url = "https://cdn.example/x.png?cb=123".to_string();
        for pattern in URL_CLEANING.iter() {
            url = pattern.replace_all(&url, "").into_owned();
        }
        assert_eq!(url, "https://cdn.example/x.png");
    }

    #[test]
    fn url_cleaning_strips_revision_and_scale_segments() {
        let mut url = "https://cdn.example/x/revision/latest/scale-to-width-down/200".to_string();
        for pattern in URL_CLEANING.iter() {
            url = pattern.replace_all(&url, "").into_owned();
        }
        assert_eq!(url, "https://cdn.example/x");
    }

    #[test]
    fn hiding_style_matches_both_declarations() {
        assert!(HIDING_STYLE.is_match("display:none"));
        assert!(HIDING_STYLE.is_match("width: 10px; display: none"));
        assert!(HIDING_STYLE.is_match("visibility:  hidden"));
        assert!(!HIDING_STYLE.is_match("display: block"));
    }

    #[test]
    fn illegal_filename_chars_are_caught() {
        assert!(ILLEGAL_FILENAME_CHARS.is_match("Nuka/Cola"));
        assert!(ILLEGAL_FILENAME_CHARS.is_match(r#"a"b"#));
        assert!(!ILLEGAL_FILENAME_CHARS.is_match("Nuka_Cola"));
    }
}
