/*
 * tests/cli.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Tests for the cssmerge binary.
 */

use std::path::Path;
use std::process::{Command, Output};

fn cssmerge(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cssmerge"))
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .unwrap()
}

fn write(dir: &Path, path: &str, content: &str) {
    let path = dir.join(path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_development_bundle() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "client/a.css", ".x{color:red}");
    write(dir.path(), "client/b.css", "@import 'y.css'; .y{color:blue}");

    let output = cssmerge(
        dir.path(),
        &["bundle", "client/a.css", "client/b.css", "--out-dir", "out"],
    );
    assert!(output.status.success());

    let code = std::fs::read_to_string(dir.path().join("out/merged-stylesheets.css")).unwrap();
    assert!(code.starts_with("@import 'y.css';"));

    let map = std::fs::read_to_string(dir.path().join("out/merged-stylesheets.css.map")).unwrap();
    let map: serde_json::Value = serde_json::from_str(&map).unwrap();
    assert_eq!(map["version"], 3);
    assert_eq!(map["sources"], serde_json::json!(["client/b.css", "client/a.css"]));
}

#[test]
fn test_hoisted_import_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "client/a.css", ".x{color:red}");
    write(dir.path(), "client/b.css", "@import 'y.css'; .y{color:blue}");

    let output = cssmerge(
        dir.path(),
        &["bundle", "client/a.css", "client/b.css", "--out-dir", "out"],
    );
    assert!(output.status.success());

    // reported even with logging switched off
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Warning [M-2-1]: Import Hoisted"));
    assert!(stderr.contains("@import 'y.css' was hoisted above .x (client/a.css)"));
    assert!(stderr.contains("• In client/b.css"));
}

#[test]
fn test_upstream_map_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.css", ".x{color:red}");
    write(
        dir.path(),
        "a.css.map",
        r#"{"version":3,"sources":["a.less"],"names":[],"mappings":"AAEA"}"#,
    );

    let output = cssmerge(dir.path(), &["bundle", "a.css", "-o", "out"]);
    assert!(output.status.success());

    let map = std::fs::read_to_string(dir.path().join("out/merged-stylesheets.css.map")).unwrap();
    let map: serde_json::Value = serde_json::from_str(&map).unwrap();
    assert_eq!(map["sources"], serde_json::json!(["a.less"]));
}

#[test]
fn test_production_bundle_with_config() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "package.json",
        r#"{"name": "app", "postcss": {"plugins": {"banner": {"text": "built"}}}}"#,
    );
    write(dir.path(), "a.css", ".a { color: red }");

    let output = cssmerge(
        dir.path(),
        &["bundle", "a.css", "--mode", "production", "-o", "out"],
    );
    assert!(output.status.success());

    let code =
        std::fs::read_to_string(dir.path().join("out/merged-stylesheets.min.css")).unwrap();
    assert_eq!(code, ".a{color:red}");
    assert!(!dir.path().join("out/merged-stylesheets.min.css.map").exists());
}

#[test]
fn test_split_production_bundle() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.css", ".a{} .b{} .c{}");

    let output = cssmerge(
        dir.path(),
        &[
            "bundle",
            "a.css",
            "--mode",
            "production",
            "--max-selectors",
            "2",
            "-o",
            "out",
        ],
    );
    assert!(output.status.success());

    let first =
        std::fs::read_to_string(dir.path().join("out/merged-stylesheets.1.min.css")).unwrap();
    let second =
        std::fs::read_to_string(dir.path().join("out/merged-stylesheets.2.min.css")).unwrap();
    assert_eq!(first, ".a{}.b{}");
    assert_eq!(second, ".c{}");
}

#[test]
fn test_parse_error_fails_the_command() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.css", ".a{}");
    write(dir.path(), "b.css", ".b {");

    let output = cssmerge(dir.path(), &["bundle", "a.css", "b.css", "-o", "out"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unclosed block"));
    assert!(stderr.contains("b.css"));

    // the other file is still merged
    let code = std::fs::read_to_string(dir.path().join("out/merged-stylesheets.css")).unwrap();
    assert_eq!(code, ".a {}\n");
}

#[test]
fn test_unknown_plugin_fails_the_command() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "package.json",
        r#"{"postcss": {"plugins": {"autoprefixer": {}}}}"#,
    );
    write(dir.path(), "a.css", ".a{}");

    let output = cssmerge(dir.path(), &["bundle", "a.css"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown plugin 'autoprefixer'"));
    assert!(!dir.path().join("merged-stylesheets.css").exists());
}

#[test]
fn test_only_partials_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "imports/a.css", ".a{}");

    let output = cssmerge(dir.path(), &["bundle", "imports/a.css", "-o", "out"]);
    assert!(output.status.success());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_plugins_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = cssmerge(dir.path(), &["plugins"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "banner\nreplace\nstrip-comments\n"
    );
}
