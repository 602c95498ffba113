//! # mirror-polish
//!
//! Post-processing for locally-mirrored wiki sites.
//!
//! A mirror saved by an offline-browsing tool still carries the live site's
//! baggage: advertising and navigation chrome, tracking markup, lazily-loaded
//! images that never resolve without JavaScript, and absolute CDN / wiki URLs
//! that point back at the network. This crate rewrites every HTML document in
//! such a mirror so it renders correctly and cleanly when browsed from disk.
//!
//! Processing is a fixed three-stage pipeline per document:
//!
//! 1. **Stabilize** ([`stabilize`]): promote deferred-loading attributes into
//!    real `src`/`srcset`, force collapsed and script-hidden content visible.
//! 2. **Sanitize** ([`sanitize`]): detach ad/navigation/tracking elements,
//!    prune non-essential metadata and noisy comments.
//! 3. **Rewrite** ([`rewrite`]): relativize CDN asset URLs and wiki article
//!    links against the local file tree.
//!
//! The stage order is load-bearing: sanitization and rewriting must see the
//! revealed/promoted attributes, not lazy-loading placeholders.
//!
//! ## Quick Start
//!
//! ```rust
//! use dom_query::Document;
//! use mirror_polish::stabilize::stabilize;
//!
//! let doc = Document::from(r#"<img src="blank.gif" data-src="real.png">"#);
//! let modified = stabilize(&doc);
//!
//! assert!(modified);
//! assert!(doc.html().contains(r#"src="real.png""#));
//! ```
//!
//! Whole-tree runs go through [`Pipeline`], which discovers every `*.html`
//! file under the mirror root, enforces the pre-run backup precondition, and
//! isolates per-document failures so one broken page never aborts the run.

mod error;

/// Run configuration: mirror root, backup location, backup skip.
pub mod options;

/// Compiled-in rule catalog: removal selectors, CDN domains, denylists.
pub mod rules;

/// Compiled regex patterns for URL cleaning and style matching.
pub mod patterns;

/// Character encoding detection and encoding-tolerant file reads.
pub mod encoding;

/// Relative-path math and filename sanitization.
pub mod paths;

/// Content stabilization: lazy-loading promotion and hidden-content reveal.
pub mod stabilize;

/// Markup sanitization: ad/navigation/tracking removal, metadata pruning.
pub mod sanitize;

/// Reference rewriting: CDN assets and wiki article links to local paths.
pub mod rewrite;

/// Read-only index of the mirror's file tree for article link resolution.
pub mod index;

/// Pre-run backup copy of the mirror tree.
pub mod backup;

/// Whole-tree orchestration with per-document failure isolation.
pub mod pipeline;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::Options;
pub use pipeline::{Pipeline, RunReport};
