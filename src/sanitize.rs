//! Markup sanitization.
//!
//! Detaches advertising, navigation, and tracking structure from a document
//! and prunes metadata that only matters to a live site (SEO metas, social
//! cards, analytics comments). Removal means detaching the subtree, not
//! hiding it.
//!
//! Unlike the stabilizer, which *reveals* marker-class hidden elements, the
//! final pass here removes them outright. The asymmetry is deliberate: a
//! document sanitized standalone treats such elements as noise, while the
//! full pipeline stabilizes first so legitimate content has already been
//! revealed by the time this pass runs.

use dom_query::{Document, NodeData, NodeRef, Selection};
use log::debug;

use crate::patterns::HIDING_STYLE;
use crate::rules::{
    COMMENT_NOISE_KEYWORDS, HIDDEN_MARKER_CLASSES, META_NAME_DENYLIST, REMOVAL_RULES,
    SOCIAL_META_PREFIXES,
};

/// Remove advertising/navigation/tracking nodes and non-essential metadata.
///
/// Idempotent: a second pass over sanitized output matches nothing. Returns
/// whether the tree changed.
pub fn sanitize(doc: &Document) -> bool {
    let rules = apply_removal_rules(doc);
    let metas = prune_meta_tags(doc);
    let comments = prune_noise_comments(doc);
    let hidden = remove_marked_hidden(doc);
    rules || metas || comments || hidden
}

/// Detach every node the removal catalog marks, iterating one uniform rule
/// list regardless of rule shape.
fn apply_removal_rules(doc: &Document) -> bool {
    let mut modified = false;

    for rule in REMOVAL_RULES.iter() {
        for node in rule.candidates(doc).nodes() {
            let el = Selection::from(*node);
            if rule.applies_to(&el) {
                el.remove();
                modified = true;
                debug!("removed element matching {rule:?}");
            }
        }
    }

    modified
}

/// Prune non-essential `meta` elements. Charset and viewport declarations
/// are load-bearing for offline rendering and always survive.
fn prune_meta_tags(doc: &Document) -> bool {
    let mut modified = false;

    for node in doc.select("meta").nodes() {
        let meta = Selection::from(*node);
        if meta.has_attr("charset") {
            continue;
        }
        if meta.attr("name").is_some_and(|name| name.as_ref() == "viewport") {
            continue;
        }

        let denied_name = meta
            .attr("name")
            .is_some_and(|name| META_NAME_DENYLIST.contains(&name.as_ref()));
        let social_card = meta.attr("property").is_some_and(|property| {
            SOCIAL_META_PREFIXES
                .iter()
                .any(|prefix| property.starts_with(prefix))
        });

        if denied_name || social_card {
            meta.remove();
            modified = true;
        }
    }

    modified
}

/// Remove comment nodes whose text mentions tracking/advertising/analytics
/// machinery (case-insensitive substring match).
fn prune_noise_comments(doc: &Document) -> bool {
    let mut noisy: Vec<NodeRef> = Vec::new();
    let mut stack = vec![doc.root()];

    while let Some(node) = stack.pop() {
        if node.is_comment() {
            if let Some(text) = comment_text(&node) {
                let lowered = text.to_lowercase();
                if COMMENT_NOISE_KEYWORDS
                    .iter()
                    .any(|keyword| lowered.contains(keyword))
                {
                    noisy.push(node);
                }
            }
        }

        let mut child = node.first_child();
        while let Some(current) = child {
            child = current.next_sibling();
            stack.push(current);
        }
    }

    let modified = !noisy.is_empty();
    for node in noisy {
        node.remove_from_parent();
    }
    modified
}

fn comment_text(node: &NodeRef) -> Option<String> {
    node.query(|tree_node| match &tree_node.data {
        NodeData::Comment { contents } => Some(contents.to_string()),
        _ => None,
    })
    .flatten()
}

/// Remove elements that are both inline-hidden and marked as intentionally
/// hidden. Layout-hidden elements without a marker class are left alone.
fn remove_marked_hidden(doc: &Document) -> bool {
    let mut modified = false;

    for node in doc.select("[style]").nodes() {
        let el = Selection::from(*node);
        let Some(style) = el.attr("style") else {
            continue;
        };
        if !HIDING_STYLE.is_match(&style) {
            continue;
        }
        if !HIDDEN_MARKER_CLASSES.iter().any(|class| el.has_class(class)) {
            continue;
        }

        el.remove();
        modified = true;
    }

    modified
}
