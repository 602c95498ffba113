//! Whole-tree orchestration.
//!
//! Discovers every HTML document under the mirror root and runs each one
//! through the fixed transform sequence stabilize → sanitize → rewrite. The
//! order is load-bearing: sanitization and rewriting must see revealed and
//! promoted attributes, not lazy-loading placeholders.
//!
//! Documents are processed strictly sequentially, one parse tree resident
//! at a time, and each document is a unit of work: a failure is caught
//! here, logged with the file identified, and the run continues with the
//! next document.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dom_query::Document;
use log::{error, info};
use walkdir::WalkDir;

use crate::backup::ensure_backup;
use crate::encoding::read_document;
use crate::error::{Error, Result};
use crate::index::MirrorIndex;
use crate::options::Options;
use crate::rewrite::Rewriter;
use crate::sanitize::sanitize;
use crate::stabilize::stabilize;

/// Summary of one run over the mirror tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// HTML documents found under the mirror root.
    pub discovered: usize,
    /// Documents whose rewritten serialization replaced the file.
    pub rewritten: usize,
    /// Documents no transform touched; their files were left byte-identical.
    pub unchanged: usize,
    /// Documents abandoned after an isolated failure.
    pub failed: usize,
}

impl RunReport {
    /// Documents that completed all three transforms, rewritten or not.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.rewritten + self.unchanged
    }
}

/// Run-to-completion processor for a whole mirror tree.
pub struct Pipeline {
    options: Options,
}

impl Pipeline {
    /// Create a pipeline for the given run configuration.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Process the entire mirror: validate the root, enforce the backup
    /// precondition, then transform every document.
    ///
    /// The only fatal errors are an invalid root and a failed (non-skipped)
    /// backup; per-document failures are contained and counted.
    pub fn run(&self) -> Result<RunReport> {
        let root = &self.options.mirror_root;
        if !root.is_dir() {
            return Err(Error::InvalidRoot(root.clone()));
        }

        ensure_backup(root, &self.options.backup_root(), self.options.skip_backup)?;

        info!("starting post-processing of mirror at {}", root.display());
        let documents = discover_documents(root)?;
        info!("found {} HTML files to process", documents.len());

        let index = MirrorIndex::build(root)?;
        let report = self.process_all(&documents, &index);

        info!(
            "mirror post-processing completed: {} processed, {} rewritten, {} failed",
            report.succeeded(),
            report.rewritten,
            report.failed
        );
        Ok(report)
    }

    /// Process the given documents in order, isolating per-document
    /// failures.
    #[must_use]
    pub fn process_all(&self, documents: &[PathBuf], index: &MirrorIndex) -> RunReport {
        let mut report = RunReport {
            discovered: documents.len(),
            ..RunReport::default()
        };
        let rewriter = Rewriter::new(&self.options.mirror_root, index);

        for (position, path) in documents.iter().enumerate() {
            info!(
                "processing ({}/{}): {}",
                position + 1,
                documents.len(),
                display_path(path, &self.options.mirror_root)
            );
            match self.process_document(path, &rewriter) {
                Ok(true) => {
                    report.rewritten += 1;
                    info!("processed: {}", display_path(path, &self.options.mirror_root));
                }
                Ok(false) => report.unchanged += 1,
                Err(err) => {
                    report.failed += 1;
                    error!("error processing {}: {err}", path.display());
                }
            }
        }

        report
    }

    /// One document's unit of work: encoding-tolerant read, parse, the
    /// three transforms in order, and a write-back only if something
    /// changed.
    fn process_document(&self, path: &Path, rewriter: &Rewriter) -> Result<bool> {
        let raw = read_document(path)?;
        let doc = Document::from(raw.as_str());

        let stabilized = stabilize(&doc);
        let sanitized = sanitize(&doc);
        let rewritten = rewriter.rewrite(&doc, path);

        if !(stabilized || sanitized || rewritten) {
            return Ok(false);
        }

        write_document(path, &doc.html())?;
        Ok(true)
    }
}

/// Every `*.html` file under the root, in sorted walk order.
fn discover_documents(root: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_html = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
        if is_html {
            documents.push(entry.into_path());
        }
    }

    Ok(documents)
}

/// Strict UTF-8 write-back, atomic from the caller's perspective: content
/// lands in a temp file in the document's directory and is renamed over
/// the original.
fn write_document(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| write_error(path, e))?;
    tmp.flush().map_err(|e| write_error(path, e))?;
    tmp.persist(path).map_err(|e| write_error(path, e.error))?;
    Ok(())
}

fn write_error(path: &Path, source: io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Document path relative to the mirror root, for log lines.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::RunReport;

    #[test]
    fn succeeded_counts_both_outcomes() {
        let report = RunReport {
            discovered: 5,
            rewritten: 2,
            unchanged: 2,
            failed: 1,
        };
        assert_eq!(report.succeeded(), 4);
    }

    #[test]
    fn run_rejects_missing_root() {
        let pipeline = super::Pipeline::new(crate::Options::new("/no/such/mirror"));
        let result = pipeline.run();
        assert!(matches!(
            result,
            Err(crate::Error::InvalidRoot(path)) if path == PathBuf::from("/no/such/mirror")
        ));
    }
}
