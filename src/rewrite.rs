//! Reference rewriting.
//!
//! Rewrites the two reference kinds a mirrored page still points at the
//! network for: CDN-hosted assets (mapped to the mirror's per-domain asset
//! directories) and wiki article links (resolved against the local file
//! tree). Everything else — external links, ambiguous site-relative links —
//! is left untouched.
//!
//! Failures are per-reference, never per-document: a URL that cannot be
//! mapped keeps its original value and the rewriter moves on.

use std::path::Path;

use dom_query::{Document, Selection};
use log::{debug, warn};
use percent_encoding::percent_decode_str;

use crate::index::MirrorIndex;
use crate::paths::{relative_path, sanitize_filename};
use crate::patterns::URL_CLEANING;
use crate::rules::ASSET_DOMAINS;

/// Path marker identifying a wiki article reference inside an href.
const ARTICLE_MARKER: &str = "/wiki/";

/// Canonical extension of mirrored article documents.
const DOCUMENT_EXTENSION: &str = ".html";

/// Strip fragments, cleaning-pattern matches, and trailing separators from
/// a URL.
///
/// The cleaning patterns are applied in catalog order; scale-variant path
/// segments may only become trailing (and thus trimmable) after an earlier
/// pattern removes an enclosing query string.
#[must_use]
pub fn clean_url(url: &str) -> String {
    let mut cleaned = url.split('#').next().unwrap_or(url).to_string();
    for pattern in URL_CLEANING.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim_end_matches(['?', '&', '/']).to_string()
}

/// Rewrites one document's references against the mirror tree.
///
/// Holds the mirror root for path math and a borrowed run-scoped
/// [`MirrorIndex`] for article resolution.
pub struct Rewriter<'a> {
    mirror_root: &'a Path,
    index: &'a MirrorIndex,
}

impl<'a> Rewriter<'a> {
    /// Create a rewriter for the mirror rooted at `mirror_root`.
    #[must_use]
    pub fn new(mirror_root: &'a Path, index: &'a MirrorIndex) -> Self {
        Self { mirror_root, index }
    }

    /// Rewrite asset URLs and article links to local relative paths.
    ///
    /// `document_path` is the on-disk location of `doc`; relative paths are
    /// computed from its directory. Returns whether the tree changed.
    #[must_use]
    pub fn rewrite(&self, doc: &Document, document_path: &Path) -> bool {
        let Some(document_dir) = document_path.parent() else {
            warn!(
                "document {} has no parent directory, skipping rewrite",
                document_path.display()
            );
            return false;
        };

        let sources = self.rewrite_asset_sources(doc, document_dir);
        let srcsets = self.rewrite_source_srcsets(doc, document_dir);
        let articles = self.rewrite_article_links(doc, document_dir);
        sources || srcsets || articles
    }

    /// Point `img`/`source` `src` attributes at the mirrored asset copies.
    fn rewrite_asset_sources(&self, doc: &Document, document_dir: &Path) -> bool {
        let mut modified = false;

        for node in doc.select("img, source").nodes() {
            let el = Selection::from(*node);
            let Some(src) = el.attr("src") else {
                continue;
            };
            if let Some(rel) = self.localize_asset_url(&src, document_dir) {
                if rel != src.as_ref() {
                    el.set_attr("src", &rel);
                    modified = true;
                    debug!("fixed image path: {src} -> {rel}");
                }
            }
        }

        modified
    }

    /// Best-effort srcset rewriting on nested `source` elements, one
    /// candidate URL at a time.
    fn rewrite_source_srcsets(&self, doc: &Document, document_dir: &Path) -> bool {
        let mut modified = false;

        for node in doc.select("picture source").nodes() {
            let el = Selection::from(*node);
            let Some(srcset) = el.attr("srcset") else {
                continue;
            };
            if let Some(rewritten) = self.localize_srcset(&srcset, document_dir) {
                el.set_attr("srcset", &rewritten);
                modified = true;
                debug!("fixed srcset: {srcset} -> {rewritten}");
            }
        }

        modified
    }

    /// Resolve wiki article links against the mirror index.
    ///
    /// Root-relative links matching neither the article marker nor a known
    /// CDN domain are intentionally left untouched.
    fn rewrite_article_links(&self, doc: &Document, document_dir: &Path) -> bool {
        let mut modified = false;

        for node in doc.select("a[href]").nodes() {
            let link = Selection::from(*node);
            let Some(href) = link.attr("href") else {
                continue;
            };
            let href_str: &str = &href;
            let Some(marker) = href_str.find(ARTICLE_MARKER) else {
                continue;
            };

            let article = &href_str[marker + ARTICLE_MARKER.len()..];
            let article = article.split(['?', '#']).next().unwrap_or("");
            let decoded = percent_decode_str(article).decode_utf8_lossy();
            let stem = sanitize_filename(&decoded);
            if stem.is_empty() {
                continue;
            }
            let file_name = format!("{stem}{DOCUMENT_EXTENSION}");

            let Some(target) = self.index.resolve(&stem, &file_name) else {
                // Expected for external or never-mirrored pages.
                debug!("target file not found for link: {href_str}");
                continue;
            };

            match relative_path(target, document_dir) {
                Some(rel) if rel != href_str => {
                    link.set_attr("href", &rel);
                    modified = true;
                    debug!("fixed article link: {href_str} -> {rel}");
                }
                Some(_) => {}
                None => warn!("could not compute relative path for link: {href_str}"),
            }
        }

        modified
    }

    /// Map a CDN asset URL to the relative path of its local copy.
    ///
    /// Returns `None` for URLs not referencing a known CDN domain, and for
    /// the cross-root case where no relative path exists (warned, never
    /// fatal).
    fn localize_asset_url(&self, url: &str, document_dir: &Path) -> Option<String> {
        let cleaned = clean_url(url);
        let domain = *ASSET_DOMAINS.iter().find(|domain| cleaned.contains(*domain))?;
        let (_, tail) = cleaned.split_once(domain)?;
        let tail = tail.trim_start_matches('/');

        let local = self.mirror_root.join(domain).join(tail);
        match relative_path(&local, document_dir) {
            Some(rel) => Some(rel),
            None => {
                warn!("could not compute relative path for: {cleaned}");
                None
            }
        }
    }

    /// Rewrite every CDN candidate inside an srcset list, preserving
    /// descriptors. Returns `None` when no candidate changed so the caller
    /// leaves the attribute byte-identical.
    fn localize_srcset(&self, srcset: &str, document_dir: &Path) -> Option<String> {
        let mut changed = false;

        let candidates: Vec<String> = srcset
            .split(',')
            .map(|candidate| {
                let trimmed = candidate.trim();
                let (url, descriptor) = match trimmed.split_once(char::is_whitespace) {
                    Some((url, descriptor)) => (url, Some(descriptor.trim())),
                    None => (trimmed, None),
                };

                match self.localize_asset_url(url, document_dir) {
                    Some(rel) if rel != url => {
                        changed = true;
                        match descriptor {
                            Some(descriptor) => format!("{rel} {descriptor}"),
                            None => rel,
                        }
                    }
                    _ => trimmed.to_string(),
                }
            })
            .collect();

        changed.then(|| candidates.join(", "))
    }
}
