//! Read-only diagnostic inspector for a mirrored wiki site.
//!
//! Enumerates the mirror's structure and samples a few pages so the state
//! of a download can be judged before (or after) post-processing. Writes
//! nothing and has no effect on core behavior.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use walkdir::WalkDir;

use mirror_polish::encoding::decode_lossy;
use mirror_polish::options::DEFAULT_MIRROR_ROOT;
use mirror_polish::rules::{ASSET_DOMAINS, IMAGE_EXTENSIONS};

/// Number of sample pages whose content markers are reported.
const SAMPLE_PAGES: usize = 3;

/// Bytes of each sample page inspected for markers.
const SAMPLE_WINDOW: usize = 1000;

#[derive(Debug, Parser)]
#[command(
    name = "inspect-mirror",
    version,
    about = "Analyze the structure of a mirrored wiki site (read-only)"
)]
struct Cli {
    /// Path to the mirror root directory.
    #[arg(value_name = "PATH")]
    mirror_root: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = cli
        .mirror_root
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MIRROR_ROOT));
    if !root.is_dir() {
        bail!("mirror root is not a directory: {}", root.display());
    }

    println!("Analyzing mirror structure at: {}", root.display());
    println!("{}", "=".repeat(50));

    list_top_level(&root)?;
    report_asset_directories(&root);
    sample_documents(&root);
    report_image_extensions(&root);
    Ok(())
}

fn list_top_level(root: &Path) -> Result<()> {
    println!("Top-level directories:");
    let mut entries: Vec<_> = fs::read_dir(root)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(std::fs::DirEntry::path);
    for entry in entries {
        if entry.path().is_dir() {
            println!("  - {}/", entry.file_name().to_string_lossy());
        }
    }
    println!();
    Ok(())
}

/// Directories holding mirrored CDN assets, with their dominant file types.
fn report_asset_directories(root: &Path) {
    let mut found = false;
    for domain in ASSET_DOMAINS {
        let dir = root.join(domain);
        if !dir.is_dir() {
            continue;
        }
        if !found {
            println!("Mirrored asset directories:");
            found = true;
        }
        println!("  - {domain}/");
        for (ext, count) in top_extensions(&dir, 5) {
            println!("    * {ext}: {count} files");
        }
    }
    if !found {
        println!("No recognized asset directories found.");
    }
    println!();
}

fn top_extensions(dir: &Path, limit: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entry in WalkDir::new(dir).follow_links(false).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .map_or_else(String::new, |e| format!(".{}", e.to_string_lossy().to_lowercase()));
        *counts.entry(ext).or_insert(0) += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(limit);
    sorted
}

/// Check the first few pages for the markers post-processing cares about.
fn sample_documents(root: &Path) {
    let documents = html_documents(root);
    println!("Total HTML files found: {}", documents.len());
    println!();
    println!("Sample HTML file analysis:");

    for (position, path) in documents.iter().take(SAMPLE_PAGES).enumerate() {
        let shown = path.strip_prefix(root).unwrap_or(path);
        println!();
        println!("File {}: {}", position + 1, shown.display());

        let Ok(bytes) = fs::read(path) else {
            println!("  (unreadable)");
            continue;
        };
        let content = decode_lossy(&bytes[..bytes.len().min(SAMPLE_WINDOW)]);

        let checks = [
            (
                "CDN image links",
                ASSET_DOMAINS.iter().any(|domain| content.contains(domain)),
            ),
            (
                "Lazy loading",
                ["data-src", "data-lazy-src", "loading="]
                    .iter()
                    .any(|marker| content.contains(marker)),
            ),
            (
                "Infoboxes/collapsible",
                ["infobox", "mw-collapsible", "collapsible"]
                    .iter()
                    .any(|marker| content.contains(marker)),
            ),
        ];
        for (label, present) in checks {
            println!("  [{}] {label}", if present { "x" } else { " " });
        }
    }
    println!();
}

fn html_documents(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Image extension histogram over the whole mirror.
fn report_image_extensions(root: &Path) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entry in WalkDir::new(root).follow_links(false).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let dotted = format!(".{}", ext.to_lowercase());
        if IMAGE_EXTENSIONS.contains(&dotted.as_str()) {
            *counts.entry(dotted).or_insert(0) += 1;
        }
    }

    println!("Image file extensions found in entire mirror:");
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    for (ext, count) in sorted {
        println!("  {ext}: {count} files");
    }
}
