//! E2E CLI tests covering:
//! - item lifecycle (`wl add`, `wl remove`, `wl set`, `wl empty`)
//! - lookups (`wl get`, `wl has`, `wl show`)
//! - metadata merge/replace/clear (`wl meta`)
//! - persistence across runs for the sqlite and file backends
//! - error codes on rejected input
//!
//! Each test runs `wl` as a subprocess in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the `wl` binary, rooted in `dir`.
fn wl_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wl"));
    cmd.current_dir(dir);
    cmd.env("WISHLIST_LOG", "error");
    cmd.env("FORMAT", "text");
    cmd
}

/// Run a command with `--json` and parse stdout.
fn wl_json(dir: &Path, args: &[&str]) -> Value {
    let output = wl_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("wl should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

fn item_ids(state: &Value) -> Vec<String> {
    state["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["id"].as_str().expect("item id").to_string())
        .collect()
}

fn write_config(dir: &Path, body: &str) {
    let config_dir = dir.join(".wishlist");
    std::fs::create_dir_all(&config_dir).expect("create .wishlist");
    std::fs::write(config_dir.join("config.toml"), body).expect("write config");
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn add_updates_totals_and_persists() {
    let dir = TempDir::new().expect("temp dir");

    let state = wl_json(dir.path(), &["add", "test", "1000"]);
    assert_eq!(state["totalWishlistItems"], json!(1));
    assert_eq!(state["wishlistTotal"], json!(1000.0));
    assert_eq!(state["isWishlistEmpty"], json!(false));
    assert_eq!(state["items"][0]["itemTotal"], json!(1000.0));

    let state = wl_json(dir.path(), &["show"]);
    assert_eq!(item_ids(&state), ["test"]);
    assert!(dir.path().join(".wishlist/wishlist.db").exists());
}

#[test]
fn overflowing_total_keeps_items_across_runs() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["add", "a", "1e308"]);
    wl_json(dir.path(), &["add", "b", "1e308"]);

    let state = wl_json(dir.path(), &["show"]);
    assert_eq!(item_ids(&state), ["a", "b"]);
    assert_eq!(state["totalWishlistItems"], json!(2));
    assert_eq!(state["wishlistTotal"], json!(null));
}

#[test]
fn zero_price_item_is_not_empty() {
    let dir = TempDir::new().expect("temp dir");
    let state = wl_json(dir.path(), &["add", "free", "0"]);
    assert_eq!(state["isWishlistEmpty"], json!(false));
    assert_eq!(state["wishlistTotal"], json!(0.0));
}

#[test]
fn remove_last_item_empties_wishlist() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["add", "test", "1000"]);

    let state = wl_json(dir.path(), &["remove", "test"]);
    assert_eq!(state["items"], json!([]));
    assert_eq!(state["totalWishlistItems"], json!(0));
    assert_eq!(state["isWishlistEmpty"], json!(true));
}

#[test]
fn set_replaces_existing_items() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["add", "x", "500"]);

    let state = wl_json(
        dir.path(),
        &["set", r#"[{"id":"a","price":1000},{"id":"b","price":2000}]"#],
    );
    assert_eq!(item_ids(&state), ["a", "b"]);
    assert_eq!(state["wishlistTotal"], json!(3000.0));
}

#[test]
fn duplicate_add_fails_with_code_and_keeps_state() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["add", "test", "10"]);

    wl_cmd(dir.path())
        .args(["add", "test", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"))
        .stderr(predicate::str::contains("already in the wishlist"))
        .stderr(predicate::str::contains("hint:"));

    let state = wl_json(dir.path(), &["show"]);
    assert_eq!(state["totalWishlistItems"], json!(1));
    assert_eq!(state["wishlistTotal"], json!(10.0));
}

#[test]
fn add_keeps_extra_fields() {
    let dir = TempDir::new().expect("temp dir");
    let state = wl_json(
        dir.path(),
        &["add", "lamp", "25.5", "--field", "name=Desk lamp", "--field", "qty=2"],
    );
    assert_eq!(state["items"][0]["name"], json!("Desk lamp"));
    assert_eq!(state["items"][0]["qty"], json!(2));
}

#[test]
fn empty_resets_items_metadata_and_id() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["--wishlist", "gifts", "add", "a", "1"]);
    wl_json(dir.path(), &["--wishlist", "gifts", "meta", "update", r#"{"k":"v"}"#]);

    let state = wl_json(dir.path(), &["--wishlist", "gifts", "empty"]);
    assert!(state.get("id").is_none());
    assert_eq!(state["items"], json!([]));
    assert_eq!(state["metadata"], json!({}));
    assert_eq!(state["isWishlistEmpty"], json!(true));
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[test]
fn has_prints_true_or_false() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["add", "kettle", "39"]);

    wl_cmd(dir.path())
        .args(["has", "kettle"])
        .assert()
        .success()
        .stdout("true\n");
    wl_cmd(dir.path())
        .args(["has", "toaster"])
        .assert()
        .success()
        .stdout("false\n");
}

#[test]
fn get_prints_item_or_fails() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["add", "kettle", "39.5"]);

    let item = wl_json(dir.path(), &["get", "kettle"]);
    assert_eq!(item["id"], json!("kettle"));
    assert_eq!(item["price"], json!(39.5));

    wl_cmd(dir.path())
        .args(["get", "toaster"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2003"));
}

#[test]
fn text_show_lists_summary_and_items() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["--wishlist", "w1", "add", "a", "2"]);
    wl_json(dir.path(), &["--wishlist", "w1", "add", "b", "3.5"]);

    wl_cmd(dir.path())
        .args(["--wishlist", "w1", "show"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("w1\t2\t5.5\n"))
        .stdout(predicate::str::contains("a\t2\t"))
        .stdout(predicate::str::contains("b\t3.5\t"));
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

#[test]
fn meta_update_merges_and_set_replaces() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["meta", "update", r#"{"coupon":"abc"}"#]);
    let state = wl_json(dir.path(), &["meta", "update", r#"{"notes":"n"}"#]);
    assert_eq!(state["metadata"], json!({"coupon": "abc", "notes": "n"}));

    let state = wl_json(dir.path(), &["meta", "set", r#"{"delivery":"same-day"}"#]);
    assert_eq!(state["metadata"], json!({"delivery": "same-day"}));

    let state = wl_json(dir.path(), &["meta", "clear"]);
    assert_eq!(state["metadata"], json!({}));
}

#[test]
fn meta_rejects_non_objects() {
    let dir = TempDir::new().expect("temp dir");
    wl_cmd(dir.path())
        .args(["meta", "set", "[1,2]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}

// ---------------------------------------------------------------------------
// Slots and backends
// ---------------------------------------------------------------------------

#[test]
fn named_wishlists_are_isolated() {
    let dir = TempDir::new().expect("temp dir");
    wl_json(dir.path(), &["--wishlist", "one", "add", "a", "1"]);
    wl_json(dir.path(), &["--wishlist", "two", "add", "b", "2"]);

    let one = wl_json(dir.path(), &["--wishlist", "one", "show"]);
    let two = wl_json(dir.path(), &["--wishlist", "two", "show"]);
    assert_eq!(one["id"], json!("one"));
    assert_eq!(item_ids(&one), ["a"]);
    assert_eq!(item_ids(&two), ["b"]);
}

#[test]
fn file_backend_writes_slot_files() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path(), "[storage]\nbackend = \"file\"\n");

    wl_json(dir.path(), &["--wishlist", "gifts", "add", "a", "1"]);
    assert!(dir.path().join(".wishlist/slots/wishlist-gifts.json").exists());

    let state = wl_json(dir.path(), &["--wishlist", "gifts", "show"]);
    assert_eq!(item_ids(&state), ["a"]);
}

#[test]
fn memory_backend_forgets_between_runs() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path(), "[storage]\nbackend = \"memory\"\n");

    wl_json(dir.path(), &["add", "a", "1"]);
    let state = wl_json(dir.path(), &["show"]);
    assert_eq!(state["items"], json!([]));
}

#[test]
fn malformed_config_reports_parse_code() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path(), "[storage\nbackend = 1");

    wl_cmd(dir.path())
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[test]
fn id_uses_requested_length() {
    let dir = TempDir::new().expect("temp dir");
    let generated = wl_json(dir.path(), &["id", "--length", "20"]);
    let id = generated["id"].as_str().expect("id string");
    assert_eq!(id.len(), 20);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn id_length_defaults_from_config() {
    let dir = TempDir::new().expect("temp dir");
    write_config(dir.path(), "[identifier]\nlength = 6\n");

    let generated = wl_json(dir.path(), &["id"]);
    assert_eq!(generated["id"].as_str().map(str::len), Some(6));
}

#[test]
fn generated_wishlist_id_is_stable_across_runs() {
    let dir = TempDir::new().expect("temp dir");
    let first = wl_json(dir.path(), &["show"]);
    let second = wl_json(dir.path(), &["show"]);

    let id = first["id"].as_str().expect("generated id");
    assert_eq!(id.len(), 12);
    assert_eq!(second["id"], first["id"]);
}
