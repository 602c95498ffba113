//! Path math for reference rewriting.
//!
//! Rewritten references always use the forward-slash form regardless of the
//! host separator, because they end up inside `src`/`href` attributes.

use std::path::{Component, Path};

use crate::patterns::ILLEGAL_FILENAME_CHARS;

/// Compute the relative path from `base_dir` to `target`, using forward
/// slashes.
///
/// Both paths must share a root (both absolute or both relative); when they
/// do not, no relative path exists and `None` is returned so the caller can
/// leave the original reference untouched.
#[must_use]
pub fn relative_path(target: &Path, base_dir: &Path) -> Option<String> {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base_dir.components().collect();

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // No shared root: absolute vs relative, or different prefixes
    // (e.g. Windows drives). There is no relative form across these.
    if common == 0 && (target.has_root() || base_dir.has_root()) {
        return None;
    }

    let mut segments: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        segments.push("..".to_string());
    }
    for part in &target_parts[common..] {
        segments.push(part.as_os_str().to_string_lossy().into_owned());
    }

    if segments.is_empty() {
        return Some(".".to_string());
    }
    Some(segments.join("/"))
}

/// Replace characters illegal in filenames with underscores.
///
/// Mirrors how the mirroring tool itself flattens article titles into file
/// names, so sanitized names line up with what is actually on disk.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    ILLEGAL_FILENAME_CHARS.replace_all(name, "_").into_owned()
}
