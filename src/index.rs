//! Read-only index of the mirror's file tree.
//!
//! Built once per run instead of re-walking the tree per link: every link
//! resolution then sees one consistent snapshot, and lookup cost stops
//! scaling with tree size times link count. The index is owned by the
//! orchestrator and borrowed by the reference rewriter.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

struct IndexedFile {
    name: String,
    path: PathBuf,
}

/// A run-scoped snapshot of every file under the mirror root, queryable by
/// article file name.
pub struct MirrorIndex {
    /// All files in sorted walk order; scanned for the fallback strategies.
    files: Vec<IndexedFile>,
    /// First-wins exact name lookup.
    by_name: HashMap<String, usize>,
}

impl MirrorIndex {
    /// Scan the mirror tree once, in sorted order, recording every file.
    pub fn build(root: &Path) -> Result<Self> {
        let mut files = Vec::new();
        let mut by_name = HashMap::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            by_name.entry(name.clone()).or_insert(files.len());
            files.push(IndexedFile {
                name,
                path: entry.into_path(),
            });
        }

        Ok(Self { files, by_name })
    }

    /// Resolve a sanitized article name to a local file.
    ///
    /// Strategies in priority order, first match wins:
    /// 1. exact `file_name` match,
    /// 2. name starting with `<stem>_` (disambiguated variants),
    /// 3. name containing `stem` anywhere.
    ///
    /// The substring fallback can mis-resolve similarly-named articles in
    /// large mirrors; that imprecision is accepted rather than tightened.
    #[must_use]
    pub fn resolve(&self, stem: &str, file_name: &str) -> Option<&Path> {
        if stem.is_empty() {
            return None;
        }

        if let Some(&position) = self.by_name.get(file_name) {
            return Some(&self.files[position].path);
        }

        let prefix = format!("{stem}_");
        if let Some(file) = self.files.iter().find(|file| file.name.starts_with(&prefix)) {
            return Some(&file.path);
        }

        self.files
            .iter()
            .find(|file| file.name.contains(stem))
            .map(|file| file.path.as_path())
    }

    /// Number of indexed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the mirror tree held no files at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
