//! The compiled-in rule catalog.
//!
//! Pure configuration data shared read-only across every document in a run:
//! removal rules for the sanitizer, the CDN domain list for the rewriter,
//! and the marker-class / keyword lists both transforms consult. The two
//! removal rule kinds are variants of a single [`Rule`] type so the
//! sanitizer iterates one uniform list instead of branching by rule shape.

use std::sync::LazyLock;

use dom_query::{Document, Selection};

/// Classes and IDs to remove (advertising, navigation, tracking scripts).
pub const REMOVE_SELECTORS: &[&str] = &[
    "#global-navigation",
    "#fandom-bar",
    ".ads-container",
    ".advertisement",
    ".cookie-policy",
    ".tracking-script",
    ".analytics",
    ".fandom-sticky-header",
    "#WikiaBar",
    ".wikia-ad",
    ".mobile-top-ad",
    ".leaderboard-wrapper",
    ".incontent-ad",
    ".video-ad",
    ".ad-slot",
    ".sponsored-content",
    ".affiliate-link",
    ".donate-module",
    ".social-media-widget",
    ".taboola",
    ".outbrain",
    ".share-element",
    ".print-footer",
];

/// Image CDN domains mapped to local subdirectories of the mirror.
pub const ASSET_DOMAINS: &[&str] = &[
    "static.wikia.nocookie.net",
    "vignette.wikia.nocookie.net",
    "images.wikia.nocookie.net",
    "static.fandom.com",
    "assets.fandom.com",
];

/// File extensions recognized as images when inspecting a mirror.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

/// Meta `name` values with no offline value (SEO, authorship, robots).
pub const META_NAME_DENYLIST: &[&str] = &[
    "keywords",
    "description",
    "robots",
    "generator",
    "author",
    "publisher",
    "copyright",
];

/// Meta `property` namespace prefixes for social cards.
pub const SOCIAL_META_PREFIXES: &[&str] = &["og:", "twitter:"];

/// Keywords marking an HTML comment as tracking/advertising noise
/// (case-insensitive substring match).
pub const COMMENT_NOISE_KEYWORDS: &[&str] =
    &["tracking", "analytics", "ads", "advertising", "google"];

/// Classes marking an element as intentionally hidden for scripting or
/// accessibility, as opposed to hidden for layout.
pub const HIDDEN_MARKER_CLASSES: &[&str] = &["hidden", "invisible", "visually-hidden", "sr-only"];

/// A removal rule: either a structural CSS selector or a tag name paired
/// with attribute-value substring matchers.
///
/// Rules are immutable, loaded once, and shared read-only across all
/// documents in a run.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Remove every node matching this CSS selector.
    Selector(&'static str),

    /// Remove nodes with this tag name where at least one listed attribute's
    /// value contains (substring, not equality) at least one listed value.
    TagAttr {
        /// Tag name the rule applies to.
        tag: &'static str,
        /// `(attribute name, accepted value substrings)` pairs.
        attrs: &'static [(&'static str, &'static [&'static str])],
    },
}

impl Rule {
    /// Candidate nodes this rule could remove from `doc`.
    ///
    /// Candidates still need an [`Rule::applies_to`] check; for selector
    /// rules the check is redundant but harmless.
    #[must_use]
    pub fn candidates<'a>(&self, doc: &'a Document) -> Selection<'a> {
        match self {
            Rule::Selector(selector) => doc.select(selector),
            Rule::TagAttr { tag, .. } => doc.select(tag),
        }
    }

    /// Whether this rule marks the given node for removal.
    #[must_use]
    pub fn applies_to(&self, sel: &Selection) -> bool {
        match self {
            Rule::Selector(selector) => sel.is(selector),
            Rule::TagAttr { tag, attrs } => {
                if !sel.is(tag) {
                    return false;
                }
                attrs.iter().any(|(name, values)| {
                    sel.attr(name).is_some_and(|actual| {
                        values.iter().any(|value| actual.contains(value))
                    })
                })
            }
        }
    }
}

/// The full ordered removal catalog: structural selectors first, then
/// tag/attribute rules for tracking scripts, structured data, canonical
/// links, and social-card metas.
pub static REMOVAL_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let mut rules: Vec<Rule> = REMOVE_SELECTORS.iter().copied().map(Rule::Selector).collect();
    rules.extend([
        Rule::TagAttr {
            tag: "script",
            attrs: &[(
                "src",
                &[
                    "google-analytics.com",
                    "googletagmanager.com",
                    "facebook.com",
                    "twitter.com",
                ],
            )],
        },
        // Structured data we don't need offline
        Rule::TagAttr {
            tag: "script",
            attrs: &[("type", &["application/ld+json"])],
        },
        Rule::TagAttr {
            tag: "link",
            attrs: &[("rel", &["canonical"])],
        },
        Rule::TagAttr {
            tag: "meta",
            attrs: &[(
                "property",
                &[
                    "og:url",
                    "og:type",
                    "og:title",
                    "og:description",
                    "og:image",
                    "og:site_name",
                    "fb:app_id",
                    "twitter:card",
                    "twitter:site",
                ],
            )],
        },
    ]);
    rules
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_rule_matches_by_class() {
        let doc = Document::from(r#"<div class="ads-container">x</div><div class="content">y</div>"#);
        let rule = Rule::Selector(".ads-container");

        let candidates = rule.candidates(&doc);
        assert_eq!(candidates.length(), 1);
        assert!(rule.applies_to(&candidates));

        let content = doc.select(".content");
        assert!(!rule.applies_to(&content));
    }

    #[test]
    fn tag_attr_rule_matches_by_substring() {
        let doc = Document::from(
            r#"<script src="https://www.google-analytics.com/analytics.js"></script>
               <script src="/local/app.js"></script>"#,
        );
        let rule = Rule::TagAttr {
            tag: "script",
            attrs: &[("src", &["google-analytics.com"])],
        };

        let tracking = doc.select(r#"script[src*='google-analytics']"#);
        assert!(rule.applies_to(&tracking));

        let local = doc.select(r#"script[src='/local/app.js']"#);
        assert!(!rule.applies_to(&local));
    }

    #[test]
    fn tag_attr_rule_ignores_missing_attribute() {
        let doc = Document::from("<script>inline()</script>");
        let rule = Rule::TagAttr {
            tag: "script",
            attrs: &[("src", &["google-analytics.com"])],
        };
        assert!(!rule.applies_to(&doc.select("script")));
    }

    #[test]
    fn tag_attr_rule_requires_matching_tag() {
        let doc = Document::from(r#"<img src="https://googletagmanager.com/x.png">"#);
        let rule = Rule::TagAttr {
            tag: "script",
            attrs: &[("src", &["googletagmanager.com"])],
        };
        assert!(!rule.applies_to(&doc.select("img")));
    }

    #[test]
    fn removal_catalog_contains_both_rule_kinds() {
        let selectors = REMOVAL_RULES
            .iter()
            .filter(|rule| matches!(rule, Rule::Selector(_)))
            .count();
        let tag_rules = REMOVAL_RULES
            .iter()
            .filter(|rule| matches!(rule, Rule::TagAttr { .. }))
            .count();
        assert_eq!(selectors, REMOVE_SELECTORS.len());
        assert_eq!(tag_rules, 4);
    }
}
