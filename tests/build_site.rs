//! End-to-end build of the fixture site: scan → resolve → generate.
//!
//! The library pipeline runs against a temp copy of `fixtures/content`; the
//! CLI tests run the compiled binary the same way a user would.

use lectern::resolve::{self, ScriptureContent};
use lectern::service::Canon;
use lectern::{generate, scan};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Content copy, temp dir and output dir for one build.
struct Workspace {
    _root: TempDir,
    content: PathBuf,
    temp: PathBuf,
    dist: PathBuf,
}

fn workspace() -> Workspace {
    let root = TempDir::new().unwrap();
    let content = root.path().join("content");
    fs::create_dir_all(&content).unwrap();
    copy_dir_recursive(&fixtures(), &content).unwrap();
    Workspace {
        temp: root.path().join("temp"),
        dist: root.path().join("dist"),
        content,
        _root: root,
    }
}

fn build(ws: &Workspace) -> resolve::ResolvedSite {
    let manifest = scan::scan(&ws.content).unwrap();
    fs::create_dir_all(&ws.temp).unwrap();
    let manifest_path = ws.temp.join("manifest.json");
    fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();

    let site = resolve::resolve(&manifest_path, &ws.content, Canon::Bible, None).unwrap();
    let resolved_path = ws.temp.join("resolved.json");
    fs::write(&resolved_path, serde_json::to_string(&site).unwrap()).unwrap();

    generate::generate(&resolved_path, &ws.dist).unwrap();
    site
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

#[test]
fn pipeline_writes_every_page() {
    let ws = workspace();
    build(&ws);

    for rel in [
        "index.html",
        "about.html",
        "topics/judaism/index.html",
        "topics/christianity/index.html",
        "topics/buddhism/index.html",
        "topics/working-notes/index.html",
        "scripture/index.html",
        "scripture/genesis/1/index.html",
        "scripture/genesis/1/1/index.html",
        "scripture/john/3/index.html",
    ] {
        assert!(ws.dist.join(rel).is_file(), "missing {rel}");
    }
}

#[test]
fn unresolvable_routes_are_skipped_not_fatal() {
    let ws = workspace();
    let site = build(&ws);

    // Fixture dataset has Genesis 1 and John 3:16-17 only
    assert!(site.skipped.iter().any(|s| s.path == "scripture/genesis/2/"));
    assert!(site.skipped.iter().any(|s| s.path == "scripture/john/3/1/"));
    assert!(!ws.dist.join("scripture/genesis/2/index.html").exists());
}

#[test]
fn verse_page_shows_parallel_translations() {
    let ws = workspace();
    let site = build(&ws);

    let page = site
        .scripture
        .iter()
        .find(|p| p.path == "scripture/genesis/1/1/")
        .unwrap();
    match &page.content {
        ScriptureContent::Verse {
            parallel,
            commentary,
            ..
        } => {
            // NIV, ESV, KJV and WEB all carry Genesis 1
            assert_eq!(parallel.len(), 4);
            assert_eq!(commentary.len(), 1);
        }
        other => panic!("expected verse content, got {other:?}"),
    }

    let html = read(ws.dist.join("scripture/genesis/1/1/index.html"));
    assert!(html.contains("<th>KJV</th>"));
    assert!(html.contains("In the beginning God created the heaven and the earth."));
    assert!(html.contains("Rashi"));
    assert!(html.contains("John 1:1"));
}

#[test]
fn topic_page_marks_unavailable_passages() {
    let ws = workspace();
    build(&ws);

    let html = read(ws.dist.join("topics/christianity/index.html"));
    assert!(html.contains("For God so loved the world that he gave his one and only Son"));
    assert!(html.contains("Blessed are the poor in spirit"));
    // John 3:16 links to its verse page only if that route was built
    assert!(!html.contains(r#"href="/scripture/john/3/16/""#));
    // Matthew 5 as a whole chapter: NIV holds only 5:3, which is joined
    assert!(!html.contains("Passage unavailable"));

    let html = read(ws.dist.join("topics/judaism/index.html"));
    assert!(html.contains("You shall have no other gods before me."));
    assert!(html.contains(r#"href="/scripture/genesis/1/1/""#));
}

#[test]
fn navigation_groups_topics_by_tradition() {
    let ws = workspace();
    build(&ws);

    let html = read(ws.dist.join("index.html"));
    assert!(html.contains("Abrahamic"));
    assert!(html.contains("Dharmic"));
    assert!(html.contains(r#"href="/topics/judaism/""#));
    // Unnumbered topic is built but not linked from navigation
    assert!(!html.contains(r#"href="/topics/working-notes/""#));
    assert!(html.contains(r#"href="/about.html""#));
}

// ============================================================================
// CLI
// ============================================================================

fn lectern() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lectern"))
}

#[test]
fn cli_build_succeeds() {
    let ws = workspace();
    let out = lectern()
        .arg("build")
        .arg("--source")
        .arg(&ws.content)
        .arg("--output")
        .arg(&ws.dist)
        .arg("--temp-dir")
        .arg(&ws.temp)
        .output()
        .expect("failed to run lectern");
    assert!(
        out.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("==> Build complete"));
    assert!(ws.temp.join("manifest.json").is_file());
    assert!(ws.temp.join("resolved.json").is_file());
    assert!(ws.dist.join("scripture/john/3/index.html").is_file());
}

#[test]
fn cli_verse_lookup() {
    let out = lectern()
        .args(["verse", "John 3:16", "--translation", "kjv", "--source"])
        .arg(fixtures())
        .output()
        .expect("failed to run lectern");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("John 3:16 (KJV)"));
}

#[test]
fn cli_parallel_marks_missing() {
    let out = lectern()
        .args(["parallel", "John 3:16", "--translations", "NIV,WEB", "--source"])
        .arg(fixtures())
        .output()
        .expect("failed to run lectern");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("WEB   (unavailable)"));
}

#[test]
fn cli_unsupported_translation_fails() {
    let out = lectern()
        .args(["verse", "John 3:16", "--translation", "NASB", "--source"])
        .arg(fixtures())
        .output()
        .expect("failed to run lectern");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("NASB"));
}

#[test]
fn cli_torah_canon() {
    let out = lectern()
        .args(["verse", "John 3:16", "--canon", "torah", "--source"])
        .arg(fixtures())
        .output()
        .expect("failed to run lectern");
    assert!(!out.status.success());
}

#[test]
fn cli_gen_config_is_valid() {
    let out = lectern()
        .arg("gen-config")
        .output()
        .expect("failed to run lectern");
    assert!(out.status.success());
    let config: lectern::config::SiteConfig =
        toml::from_str(&String::from_utf8_lossy(&out.stdout)).unwrap();
    assert!(config.validate().is_ok());
}
