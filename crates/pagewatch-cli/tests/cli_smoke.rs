//! Smoke tests for the pagewatch binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn pagewatch(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pagewatch"))
        .current_dir(dir)
        .args(["--storage-dir", "archive"])
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("PAGEWATCH_STORAGE_DIR")
        .env_remove("PAGEWATCH_LOG_LEVEL")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run pagewatch")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_record_show_log_diff() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("v1.txt"), "line1\noldline2\nline3\n").unwrap();
    fs::write(dir.path().join("v2.txt"), "line1\nline2\nline3\n").unwrap();

    let first = pagewatch(
        dir.path(),
        &["record", "docs", "--file", "v1.txt", "--at", "2025-08-11T12:00:00Z"],
    );
    assert!(first.status.success(), "{:?}", first);
    assert_eq!(stdout(&first).trim(), "changed");

    let second = pagewatch(
        dir.path(),
        &[
            "record",
            "docs",
            "--file",
            "v2.txt",
            "--at",
            "2025-08-11T13:00:00Z",
            "--title",
            "Docs",
        ],
    );
    assert!(second.status.success(), "{:?}", second);

    let again = pagewatch(
        dir.path(),
        &["record", "docs", "--file", "v2.txt", "--at", "2025-08-11T14:00:00Z"],
    );
    assert!(again.status.success());
    assert_eq!(stdout(&again).trim(), "unchanged");

    let current = pagewatch(dir.path(), &["show", "docs"]);
    assert!(current.status.success());
    assert_eq!(stdout(&current), "line1\nline2\nline3\n");
    assert!(String::from_utf8_lossy(&current.stderr).contains("showing current version"));

    let earlier = pagewatch(dir.path(), &["show", "docs", "--at", "2025-08-11T12:59:59Z"]);
    assert!(earlier.status.success());
    assert_eq!(stdout(&earlier), "line1\noldline2\nline3\n");
    assert!(
        String::from_utf8_lossy(&earlier.stderr)
            .contains("showing version from 2025-08-11 12:00:00 UTC")
    );

    let log = pagewatch(dir.path(), &["log", "docs"]);
    assert!(log.status.success());
    let listing = stdout(&log);
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("+1 -1"));
    assert!(lines[0].contains("Docs"));
    assert!(lines[1].contains("baseline"));

    let diff = pagewatch(dir.path(), &["diff", "docs", "docs-20250811130000000"]);
    assert!(diff.status.success(), "{:?}", diff);
    assert_eq!(
        stdout(&diff),
        "@@ -1,4 +1,4 @@\n line1\n-oldline2\n+line2\n line3\n \n"
    );
}

#[test]
fn test_show_unknown_feed_fails() {
    let dir = TempDir::new().unwrap();
    let output = pagewatch(dir.path(), &["show", "missing"]);
    assert!(!output.status.success());
}

#[test]
fn test_batch_reports_failures() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    fs::write(
        dir.path().join("sites.toml"),
        r#"
[[sites]]
feed_name = "a"
path = "a.txt"
title = "A"

[[sites]]
feed_name = "b"
path = "missing.txt"
"#,
    )
    .unwrap();

    let output = pagewatch(dir.path(), &["batch", "--sites", "sites.toml"]);
    assert!(!output.status.success());
    let summary = stdout(&output);
    assert!(summary.contains("Total:     2"));
    assert!(summary.contains("Updated:   1"));
    assert!(summary.contains("Errors:    1"));

    let feeds = pagewatch(dir.path(), &["feeds"]);
    assert_eq!(stdout(&feeds).trim(), "a");
}

#[test]
fn test_batch_skips_invalid_entries_and_continues() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    fs::write(dir.path().join("c.txt"), "gamma").unwrap();
    fs::write(
        dir.path().join("sites.toml"),
        r#"
[[sites]]
feed_name = "a"
path = "a.txt"

[[sites]]
feed_name = "../escape"
path = "a.txt"

[[sites]]
feed_name = "a"
path = "c.txt"

[[sites]]
feed_name = "c"
path = "c.txt"
"#,
    )
    .unwrap();

    let output = pagewatch(dir.path(), &["batch", "--sites", "sites.toml"]);
    assert!(!output.status.success());
    let summary = stdout(&output);
    assert!(summary.contains("Total:     4"), "{}", summary);
    assert!(summary.contains("Updated:   2"), "{}", summary);
    assert!(summary.contains("Errors:    2"), "{}", summary);
    assert!(String::from_utf8_lossy(&output.stderr).contains("skipping invalid site entry"));

    let feeds = pagewatch(dir.path(), &["feeds"]);
    let listed: Vec<String> = stdout(&feeds).lines().map(str::to_string).collect();
    assert_eq!(listed, vec!["a", "c"]);
}

#[test]
fn test_batch_with_no_sites_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("sites.toml"), "sites = []\n").unwrap();

    let output = pagewatch(dir.path(), &["batch", "--sites", "sites.toml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No sites found"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    let init = pagewatch(dir.path(), &["config", "init"]);
    assert!(init.status.success(), "{:?}", init);
    assert!(dir.path().join("pagewatch.toml").exists());

    let again = pagewatch(dir.path(), &["config", "init"]);
    assert!(!again.status.success());

    let show = pagewatch(dir.path(), &["config", "show"]);
    assert!(show.status.success());
    assert!(stdout(&show).contains("context_lines = 3"));
}
