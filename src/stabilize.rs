//! Content stabilization.
//!
//! Mirrored pages still carry the live site's lazy-loading and collapse
//! machinery, which depends on JavaScript that never runs offline. This
//! transform rewrites the tree into its "revealed" static form: real image
//! URLs promoted out of deferred attributes, collapsible blocks pinned open,
//! and script-hidden content made visible.
//!
//! Only elements carrying an intentional-hiding marker class are revealed;
//! elements hidden for layout reasons are left alone. That tradeoff loses a
//! little recall but avoids corrupting legitimate layout toggles.

use dom_query::{Document, Selection};

use crate::patterns::{DISPLAY_NONE, HIDING_STYLE, VISIBILITY_HIDDEN};
use crate::rules::HIDDEN_MARKER_CLASSES;

/// Deferred-src attributes in promotion priority order; first match wins,
/// the rest are stripped.
const DEFERRED_SRC_ATTRS: &[&str] = &["data-src", "data-lazy-src"];

/// Deferred srcset attribute promoted on `source` elements.
const DEFERRED_SRCSET_ATTR: &str = "data-srcset";

/// Lazy-loading artifacts stripped after promotion. The canonical `srcset`
/// is not in this list: the reference rewriter still needs it.
const LAZY_ARTIFACT_ATTRS: &[&str] = &[
    "data-src",
    "data-lazy-src",
    "data-srcset",
    "data-original",
    "data-lazy",
    "onload",
    "loading",
];

/// Marker classes left behind by lazy-loading scripts.
const LAZY_CLASSES: &[&str] = &["lazyload", "lazy"];

/// Style declaration pinning collapsed content open. Appended, never
/// substituted, so it overrides whatever the existing inline style says.
const FORCE_VISIBLE: &str = "display: block !important;";

/// Force lazily-loaded and collapsed/hidden content into its revealed
/// static form.
///
/// Pure tree transform; never touches the filesystem. Returns whether the
/// tree changed so the caller can skip rewriting untouched files.
pub fn stabilize(doc: &Document) -> bool {
    let promoted = promote_deferred_media(doc);
    let expanded = expand_collapsibles(doc);
    let revealed = reveal_marked_hidden(doc);
    let galleries = reveal_hidden_galleries(doc);
    promoted || expanded || revealed || galleries
}

/// Promote deferred-loading attributes on `img`/`source` elements and strip
/// the lazy-loading leftovers.
///
/// Every `source` is handled independently, which covers `picture` groups
/// without a separate pass.
fn promote_deferred_media(doc: &Document) -> bool {
    let mut modified = false;

    for node in doc.select("img, source").nodes() {
        let el = Selection::from(*node);

        for attr in DEFERRED_SRC_ATTRS {
            if let Some(url) = el.attr(attr) {
                el.set_attr("src", &url);
                modified = true;
                break;
            }
        }

        if el.is("source") {
            if let Some(urls) = el.attr(DEFERRED_SRCSET_ATTR) {
                el.set_attr("srcset", &urls);
                modified = true;
            }
        }

        for attr in LAZY_ARTIFACT_ATTRS {
            if el.has_attr(attr) {
                el.remove_attr(attr);
                modified = true;
            }
        }

        for class in LAZY_CLASSES {
            if el.has_class(class) {
                el.remove_class(class);
                modified = true;
            }
        }
        if el.attr("class").is_some_and(|classes| classes.trim().is_empty()) {
            el.remove_attr("class");
        }
    }

    modified
}

/// Pin collapsible blocks (infoboxes, nav tables, spoiler sections) open
/// and drop their now-dead toggle controls.
fn expand_collapsibles(doc: &Document) -> bool {
    let mut modified = false;

    for node in doc.select("[class*='collapsible']").nodes() {
        let el = Selection::from(*node);

        let content =
            el.select_single("[class*='collapsible-content'], [class*='collapseButton']");
        if content.exists() {
            let style = content
                .attr("style")
                .map_or_else(String::new, |s| s.to_string());
            if !style.contains(FORCE_VISIBLE) {
                let forced = if style.is_empty() {
                    FORCE_VISIBLE.to_string()
                } else {
                    format!("{style}; {FORCE_VISIBLE}")
                };
                content.set_attr("style", &forced);
                modified = true;
            }
        }

        let toggles = el.select("[class*='toggle'], [class*='collapsiblerelement']");
        if toggles.exists() {
            toggles.remove();
            modified = true;
        }
    }

    modified
}

/// Flip hiding declarations to their visible counterparts on elements that
/// carry an intentional-hiding marker class.
fn reveal_marked_hidden(doc: &Document) -> bool {
    let mut modified = false;

    for node in doc.select("[style]").nodes() {
        let el = Selection::from(*node);
        let Some(style) = el.attr("style") else {
            continue;
        };
        if !HIDING_STYLE.is_match(&style) || !has_hidden_marker(&el) {
            continue;
        }

        let revealed = reveal_style(&style, "block");
        if revealed != style.as_ref() {
            el.set_attr("style", &revealed);
            modified = true;
        }
    }

    modified
}

/// Reveal hidden gallery/slideshow containers with `grid` display, matching
/// their typical layout role.
fn reveal_hidden_galleries(doc: &Document) -> bool {
    let mut modified = false;

    for node in doc.select("[class*='gallery'], [class*='slideshow']").nodes() {
        let el = Selection::from(*node);
        let Some(style) = el.attr("style") else {
            continue;
        };
        if !HIDING_STYLE.is_match(&style) {
            continue;
        }

        let revealed = reveal_style(&style, "grid");
        if revealed != style.as_ref() {
            el.set_attr("style", &revealed);
            modified = true;
        }
    }

    modified
}

fn has_hidden_marker(el: &Selection) -> bool {
    HIDDEN_MARKER_CLASSES.iter().any(|class| el.has_class(class))
}

/// Flip the specific hiding declarations in place, leaving every other
/// declaration untouched.
fn reveal_style(style: &str, display: &str) -> String {
    let replacement = format!("display: {display}");
    let replaced = DISPLAY_NONE.replace_all(style, replacement.as_str());
    VISIBILITY_HIDDEN
        .replace_all(&replaced, "visibility: visible")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotes_deferred_src_and_strips_artifacts() {
        let doc = Document::from(
            r#"<img src="placeholder.gif" data-src="real.png" loading="lazy" onload="init()">"#,
        );
        assert!(stabilize(&doc));

        let img = doc.select("img");
        assert_eq!(img.attr("src").as_deref(), Some("real.png"));
        assert!(!img.has_attr("data-src"));
        assert!(!img.has_attr("loading"));
        assert!(!img.has_attr("onload"));
    }

    #[test]
    fn primary_deferred_attribute_wins() {
        let doc = Document::from(r#"<img data-src="first.png" data-lazy-src="second.png">"#);
        assert!(stabilize(&doc));

        let img = doc.select("img");
        assert_eq!(img.attr("src").as_deref(), Some("first.png"));
        assert!(!img.has_attr("data-src"));
        assert!(!img.has_attr("data-lazy-src"));
    }

    #[test]
    fn secondary_deferred_attribute_used_when_primary_absent() {
        let doc = Document::from(r#"<img data-lazy-src="second.png">"#);
        assert!(stabilize(&doc));
        assert_eq!(doc.select("img").attr("src").as_deref(), Some("second.png"));
    }

    #[test]
    fn source_elements_promote_deferred_srcset() {
        let doc = Document::from(
            r#"<picture><source data-srcset="a.png 1x, b.png 2x"><img data-src="a.png"></picture>"#,
        );
        assert!(stabilize(&doc));

        let source = doc.select("source");
        assert_eq!(source.attr("srcset").as_deref(), Some("a.png 1x, b.png 2x"));
        assert!(!source.has_attr("data-srcset"));
    }

    #[test]
    fn lazy_classes_are_removed_and_empty_class_dropped() {
        let doc = Document::from(r#"<img class="lazyload" data-src="x.png">"#);
        assert!(stabilize(&doc));
        assert!(!doc.select("img").has_attr("class"));

        let doc = Document::from(r#"<img class="thumb lazy" data-src="x.png">"#);
        assert!(stabilize(&doc));
        assert_eq!(doc.select("img").attr("class").as_deref().map(str::trim), Some("thumb"));
    }

    #[test]
    fn collapsible_content_is_pinned_open_and_toggle_removed() {
        let doc = Document::from(
            r#"<div class="mw-collapsible">
                 <span class="mw-collapsible-toggle">expand</span>
                 <div class="mw-collapsible-content" style="width: 10em">body</div>
               </div>"#,
        );
        assert!(stabilize(&doc));

        let content = doc.select(".mw-collapsible-content");
        let style = content.attr("style").map(|s| s.to_string()).unwrap_or_default();
        assert!(style.starts_with("width: 10em; "));
        assert!(style.contains("display: block !important;"));
        assert!(!doc.select(".mw-collapsible-toggle").exists());
    }

    #[test]
    fn collapsible_without_style_gets_plain_declaration() {
        let doc = Document::from(
            r#"<div class="collapsible"><div class="mwe-collapsible-content">x</div></div>"#,
        );
        assert!(stabilize(&doc));
        assert_eq!(
            doc.select(".mwe-collapsible-content").attr("style").as_deref(),
            Some("display: block !important;")
        );
    }

    #[test]
    fn marker_class_reveals_hidden_element() {
        let doc = Document::from(
            r#"<span class="sr-only" style="color: red; display: none">hidden</span>"#,
        );
        assert!(stabilize(&doc));
        assert_eq!(
            doc.select("span").attr("style").as_deref(),
            Some("color: red; display: block")
        );
    }

    #[test]
    fn visibility_hidden_flips_to_visible() {
        let doc = Document::from(r#"<span class="invisible" style="visibility:hidden">x</span>"#);
        assert!(stabilize(&doc));
        assert_eq!(
            doc.select("span").attr("style").as_deref(),
            Some("visibility: visible")
        );
    }

    #[test]
    fn layout_hidden_element_without_marker_stays_hidden() {
        let doc = Document::from(r#"<div class="dropdown-menu" style="display: none">menu</div>"#);
        assert!(!stabilize(&doc));
        assert_eq!(
            doc.select("div").attr("style").as_deref(),
            Some("display: none")
        );
    }

    #[test]
    fn hidden_gallery_is_revealed_as_grid() {
        let doc = Document::from(
            r#"<div class="image-gallery" style="display: none; gap: 4px">imgs</div>"#,
        );
        assert!(stabilize(&doc));
        assert_eq!(
            doc.select("div").attr("style").as_deref(),
            Some("display: grid; gap: 4px")
        );
    }

    #[test]
    fn stabilize_is_idempotent() {
        let doc = Document::from(
            r#"<div class="mw-collapsible">
                 <span class="toggle">expand</span>
                 <div class="mw-collapsible-content">body</div>
               </div>
               <img data-src="x.png" class="lazy">
               <span class="sr-only" style="display: none">a</span>"#,
        );
        assert!(stabilize(&doc));
        let first_pass = doc.html().to_string();

        assert!(!stabilize(&doc));
        assert_eq!(doc.html().to_string(), first_pass);
    }

    #[test]
    fn clean_document_reports_unmodified() {
        let html = r#"<html><head></head><body><p>plain content</p><img src="x.png"></body></html>"#;
        let doc = Document::from(html);
        let before = doc.html().to_string();

        assert!(!stabilize(&doc));
        assert_eq!(doc.html().to_string(), before);
    }
}
