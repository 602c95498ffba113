//! Character encoding detection and encoding-tolerant document reads.
//!
//! Mirrored pages arrive in whatever encoding the live site served years
//! ago, sometimes with a charset declaration, sometimes with mangled byte
//! sequences from the mirroring tool. Reads are therefore best-effort: the
//! declared charset wins when one is found, and undecodable sequences are
//! replaced rather than failing the document. Writes, by contrast, are
//! always strict UTF-8 (see the pipeline).

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

use crate::error::{Error, Result};

/// Match `<meta charset="...">` tag.
#[allow(clippy::expect_used)]
static CHARSET_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("CHARSET_META regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag.
#[allow(clippy::expect_used)]
static HTTP_EQUIV_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("HTTP_EQUIV_CHARSET regex")
});

/// Number of leading bytes searched for a charset declaration.
const DETECTION_WINDOW: usize = 1024;

/// Detect the character encoding declared in the document head.
///
/// Checks `<meta charset>` first, then the `http-equiv` form, and falls
/// back to UTF-8 when neither declares a known label.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(DETECTION_WINDOW)];
    let head_str = String::from_utf8_lossy(head);

    for pattern in [&*CHARSET_META, &*HTTP_EQUIV_CHARSET] {
        if let Some(label) = pattern.captures(&head_str).and_then(|c| c.get(1)) {
            if let Some(encoding) = Encoding::for_label(label.as_str().as_bytes()) {
                return encoding;
            }
        }
    }

    UTF_8
}

/// Decode document bytes to a UTF-8 string, tolerating malformed input.
///
/// Invalid sequences are replaced with U+FFFD instead of erroring, so a
/// partially-corrupt mirror page still gets processed.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// Read a document from disk with best-effort encoding recovery.
pub fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_lossy(&bytes))
}
