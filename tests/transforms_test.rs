//! Cross-stage behavior of the three transforms on one document.
//!
//! The pipeline order stabilize → sanitize → rewrite is load-bearing; these
//! tests exercise the interactions that depend on it.

use std::fs;
use std::path::{Path, PathBuf};

use dom_query::Document;
use tempfile::{tempdir, TempDir};

use mirror_polish::index::MirrorIndex;
use mirror_polish::rewrite::Rewriter;
use mirror_polish::sanitize::sanitize;
use mirror_polish::stabilize::stabilize;

fn write_file(path: &Path, content: &str) {
    let parent = path.parent().expect("parent");
    fs::create_dir_all(parent).expect("create parent");
    fs::write(path, content).expect("write file");
}

fn fixture_mirror() -> (TempDir, PathBuf) {
    let temp = tempdir().expect("tempdir");
    let root = temp.path().join("mirror");
    write_file(&root.join("wiki").join("Page.html"), "<html></html>");
    write_file(&root.join("Vault_13.html"), "<html></html>");
    write_file(
        &root
            .join("vignette.wikia.nocookie.net")
            .join("fallout")
            .join("map.jpg"),
        "jpg",
    );
    (temp, root)
}

#[test]
fn rewriter_sees_promoted_deferred_urls() {
    let (_temp, root) = fixture_mirror();
    let index = MirrorIndex::build(&root).expect("index");
    let rewriter = Rewriter::new(&root, &index);

    // The real CDN URL only exists in data-src; without stabilization first,
    // the rewriter would see nothing but the placeholder.
    let doc = Document::from(
        r#"<img src="blank.gif"
                data-src="https://vignette.wikia.nocookie.net/fallout/map.jpg/revision/latest?cb=9">"#,
    );

    assert!(stabilize(&doc));
    assert!(!sanitize(&doc));
    assert!(rewriter.rewrite(&doc, &root.join("wiki").join("Page.html")));

    assert_eq!(
        doc.select("img").attr("src").as_deref(),
        Some("../vignette.wikia.nocookie.net/fallout/map.jpg")
    );
}

#[test]
fn stabilizer_reveal_preempts_sanitizer_removal() {
    let (_temp, root) = fixture_mirror();
    let index = MirrorIndex::build(&root).expect("index");
    let rewriter = Rewriter::new(&root, &index);

    // Standalone sanitization would remove this element outright; in
    // pipeline order the stabilizer reveals it first, so it survives.
    let doc = Document::from(
        r#"<span class="sr-only" style="display: none">screen reader text</span>"#,
    );

    assert!(stabilize(&doc));
    assert!(!sanitize(&doc));
    let _ = rewriter.rewrite(&doc, &root.join("wiki").join("Page.html"));

    let span = doc.select("span.sr-only");
    assert!(span.exists());
    assert_eq!(span.attr("style").as_deref(), Some("display: block"));
}

#[test]
fn sanitizer_alone_removes_marked_hidden_elements() {
    let doc = Document::from(
        r#"<span class="sr-only" style="display: none">noise</span><p>keep</p>"#,
    );

    assert!(sanitize(&doc));
    assert!(!doc.select("span.sr-only").exists());
    assert!(doc.select("p").exists());
}

#[test]
fn full_sequence_is_idempotent_on_a_busy_page() {
    let (_temp, root) = fixture_mirror();
    let index = MirrorIndex::build(&root).expect("index");
    let rewriter = Rewriter::new(&root, &index);
    let page = root.join("wiki").join("Page.html");

    let doc = Document::from(
        r#"<html><head>
             <meta charset="utf-8">
             <meta name="keywords" content="fallout,vault">
           </head><body>
             <div class="fandom-sticky-header">chrome</div>
             <div class="mw-collapsible">
               <span class="mw-collapsible-toggle">expand</span>
               <div class="mw-collapsible-content">stats</div>
             </div>
             <img class="lazyload" src="blank.gif"
                  data-src="https://vignette.wikia.nocookie.net/fallout/map.jpg?cb=1">
             <a href="/wiki/Vault_13">Vault 13</a>
           </body></html>"#,
    );

    let first = [
        stabilize(&doc),
        sanitize(&doc),
        rewriter.rewrite(&doc, &page),
    ];
    assert_eq!(first, [true, true, true]);
    let settled = doc.html().to_string();

    let second = [
        stabilize(&doc),
        sanitize(&doc),
        rewriter.rewrite(&doc, &page),
    ];
    assert_eq!(second, [false, false, false]);
    assert_eq!(doc.html().to_string(), settled);

    assert!(settled.contains(r#"href="../Vault_13.html""#));
    assert!(settled.contains(r#"src="../vignette.wikia.nocookie.net/fallout/map.jpg""#));
    assert!(!settled.contains("fandom-sticky-header"));
    assert!(!settled.contains("mw-collapsible-toggle"));
    assert!(settled.contains("display: block !important;"));
}
