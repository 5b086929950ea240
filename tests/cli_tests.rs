//! Tests for the kvhandle-cli binary
//!
//! Each test drives the built binary against its own store directory.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn cli(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kvhandle-cli"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn setup_store() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");
    (temp_dir, data_dir)
}

// =============================================================================
// Point Command Tests
// =============================================================================

#[test]
fn test_cli_put_then_get() {
    let (_temp, data_dir) = setup_store();

    let put = cli(&data_dir, &["put", "greeting", "hello"]);
    assert!(put.status.success());
    assert_eq!(stdout(&put), "OK\n");

    let get = cli(&data_dir, &["get", "greeting"]);
    assert!(get.status.success());
    assert_eq!(stdout(&get), "hello\n");
}

#[test]
fn test_cli_get_missing_key_exits_1() {
    let (_temp, data_dir) = setup_store();

    let get = cli(&data_dir, &["get", "nope"]);

    assert_eq!(get.status.code(), Some(1));
    assert!(stdout(&get).is_empty());
    assert!(String::from_utf8_lossy(&get.stderr).contains("(not found)"));
}

#[test]
fn test_cli_del_then_get() {
    let (_temp, data_dir) = setup_store();

    assert!(cli(&data_dir, &["put", "k", "v"]).status.success());
    assert!(cli(&data_dir, &["del", "k"]).status.success());

    assert_eq!(cli(&data_dir, &["get", "k"]).status.code(), Some(1));
}

#[test]
fn test_cli_del_missing_key_succeeds() {
    let (_temp, data_dir) = setup_store();

    let del = cli(&data_dir, &["del", "never-written"]);

    assert!(del.status.success());
}

// =============================================================================
// Scan / Stats Tests
// =============================================================================

#[test]
fn test_cli_scan_all_in_key_order() {
    let (_temp, data_dir) = setup_store();

    for (key, value) in [("b", "2"), ("c", "3"), ("a", "1")] {
        assert!(cli(&data_dir, &["put", key, value]).status.success());
    }

    let scan = cli(&data_dir, &["scan"]);

    assert!(scan.status.success());
    assert_eq!(stdout(&scan), "a\t1\nb\t2\nc\t3\n");
}

#[test]
fn test_cli_scan_prefix_and_limit() {
    let (_temp, data_dir) = setup_store();

    for (key, value) in [
        ("user:3", "c"),
        ("order:1", "x"),
        ("user:1", "a"),
        ("user:2", "b"),
    ] {
        assert!(cli(&data_dir, &["put", key, value]).status.success());
    }

    let scan = cli(&data_dir, &["scan", "--prefix", "user:", "--limit", "2"]);

    assert!(scan.status.success());
    assert_eq!(stdout(&scan), "user:1\ta\nuser:2\tb\n");
}

#[test]
fn test_cli_stats() {
    let (_temp, data_dir) = setup_store();

    assert!(cli(&data_dir, &["put", "a", "1"]).status.success());
    assert!(cli(&data_dir, &["put", "b", "2"]).status.success());

    let stats = cli(&data_dir, &["stats"]);
    let text = stdout(&stats);

    assert!(stats.status.success());
    assert!(text.contains("keys:         2"));
    assert!(text.contains("recovered:    true"));
}

// =============================================================================
// Argument Validation Tests
// =============================================================================

#[test]
fn test_cli_oversized_cache_is_rejected() {
    let (_temp, data_dir) = setup_store();

    let max = u64::MAX.to_string();
    let output = cli(&data_dir, &["--cache-mb", &max, "stats"]);

    // A clean error exit, not an overflow panic (exit code 101)
    assert_eq!(output.status.code(), Some(1));
    assert!(!data_dir.exists());
}
