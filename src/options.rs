//! Configuration for a processing run.
//!
//! The mirror root is passed explicitly into every component that needs it;
//! there is no process-wide mutable configuration. The rule catalog itself
//! ([`crate::rules`]) is compiled in and not part of run configuration.

use std::path::{Path, PathBuf};

/// Default mirror location, used when no root is given on the command line.
pub const DEFAULT_MIRROR_ROOT: &str = "/workspace/test_mirror";

/// Suffix appended to the mirror directory name to form the backup path.
const BACKUP_SUFFIX: &str = "_backup";

/// Configuration for one processing run.
///
/// # Example
///
/// ```rust
/// use mirror_polish::Options;
///
/// let options = Options::new("/data/fallout_mirror");
/// assert_eq!(
///     options.backup_root(),
///     std::path::PathBuf::from("/data/fallout_mirror_backup"),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Root directory of the mirrored site.
    pub mirror_root: PathBuf,

    /// Skip creating the pre-run backup copy.
    ///
    /// Default: `false`
    pub skip_backup: bool,
}

impl Options {
    /// Create options for the given mirror root with backups enabled.
    #[must_use]
    pub fn new(mirror_root: impl Into<PathBuf>) -> Self {
        Self {
            mirror_root: mirror_root.into(),
            skip_backup: false,
        }
    }

    /// Sibling path where the pre-run backup copy lives (`<root>_backup`).
    #[must_use]
    pub fn backup_root(&self) -> PathBuf {
        let name = self
            .mirror_root
            .file_name()
            .map_or_else(|| "mirror".to_string(), |n| n.to_string_lossy().into_owned());
        self.mirror_root
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(format!("{name}{BACKUP_SUFFIX}"))
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(DEFAULT_MIRROR_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_root_is_sibling_with_suffix() {
        let options = Options::new("/data/mirrors/fallout");
        assert_eq!(
            options.backup_root(),
            PathBuf::from("/data/mirrors/fallout_backup")
        );
    }

    #[test]
    fn backup_root_handles_trailing_component() {
        let options = Options::new("relative/mirror");
        assert_eq!(options.backup_root(), PathBuf::from("relative/mirror_backup"));
    }

    #[test]
    fn default_points_at_configured_root() {
        let options = Options::default();
        assert_eq!(options.mirror_root, PathBuf::from(DEFAULT_MIRROR_ROOT));
        assert!(!options.skip_backup);
    }
}
