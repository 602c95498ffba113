//! Pre-run backup of the mirror tree.
//!
//! The backup copy is the sole whole-run safety net: processing rewrites
//! documents in place, so a full recursive copy must exist at the sibling
//! backup path before any mutation. An existing backup is never silently
//! overwritten; skipping backup creation entirely requires an explicit
//! instruction.

use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Outcome of the backup precondition check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStatus {
    /// A fresh backup copy was created.
    Created,
    /// A backup already existed and was left untouched.
    AlreadyPresent,
    /// Backup creation was explicitly disabled.
    Skipped,
}

/// Ensure a backup of `root` exists at `backup_root` before mutation starts.
///
/// A failure to create the copy is fatal to the run unless backups were
/// explicitly skipped; a pre-existing backup is preserved, warned about,
/// and treated as satisfying the precondition.
pub fn ensure_backup(root: &Path, backup_root: &Path, skip: bool) -> Result<BackupStatus> {
    if skip {
        info!("backup creation skipped by request");
        return Ok(BackupStatus::Skipped);
    }

    if backup_root.exists() {
        warn!(
            "backup path {} already exists, skipping backup",
            backup_root.display()
        );
        return Ok(BackupStatus::AlreadyPresent);
    }

    copy_tree(root, backup_root).map_err(|source| Error::Backup {
        path: backup_root.to_path_buf(),
        source,
    })?;
    info!("backup created at {}", backup_root.display());
    Ok(BackupStatus::Created)
}

/// Recursively copy a directory tree. Symlinks are not expected inside a
/// saved mirror and are not followed.
fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let dest = to.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}
