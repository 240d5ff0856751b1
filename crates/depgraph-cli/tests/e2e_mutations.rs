//! E2E tests for `dg remove` and `dg prune`.
//!
//! Both commands mutate the in-memory graph only; the manifest on disk must
//! come out byte-identical.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

/// Eleven edges over eight nodes plus an isolated `island`. Removing `two`
/// orphans `four` and `five`; `three`, `six` and `one-three` keep another
/// dependent.
const LAYERED: &str = r#"
nodes = ["island"]

[defaults]
kind = "edge"

[[edges]]
from = "one"
to = "one-two"

[[edges]]
from = "one-two"
to = "one-three"

[[edges]]
from = "one-three"
to = "six"

[[edges]]
from = "one"
to = "two"

[[edges]]
from = "one"
to = "three"

[[edges]]
from = "two"
to = "three"

[[edges]]
from = "two"
to = "four"

[[edges]]
from = "two"
to = "five"

[[edges]]
from = "two"
to = "six"

[[edges]]
from = "four"
to = "five"

[[edges]]
from = "four"
to = "one-three"
"#;

fn setup() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("depgraph.toml"), LAYERED).expect("write manifest");
    dir
}

fn dg_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dg"));
    cmd.current_dir(dir);
    cmd.env("DEPGRAPH_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn dg_json(dir: &Path, args: &[&str]) -> Value {
    let output = dg_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("dg should not crash");
    assert!(
        output.status.success(),
        "dg {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("string").to_string())
        .collect()
}

#[test]
fn remove_cascades_to_orphans_only() {
    let dir = setup();
    let json = dg_json(dir.path(), &["remove", "two"]);

    assert_eq!(strings(&json["removed"]), vec!["two", "four", "five"]);
    assert_eq!(
        strings(&json["remaining"]),
        vec!["one", "one-two", "one-three", "six", "three", "island"]
    );
}

#[test]
fn remove_leaves_manifest_untouched() {
    let dir = setup();
    dg_cmd(dir.path())
        .args(["remove", "one", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("one\n"));

    let on_disk = std::fs::read_to_string(dir.path().join("depgraph.toml")).expect("read");
    assert_eq!(on_disk, LAYERED);

    let json = dg_json(dir.path(), &["nodes"]);
    assert_eq!(json["count"], 9);
}

#[test]
fn remove_unknown_node_fails() {
    let dir = setup();
    dg_cmd(dir.path())
        .args(["remove", "ghost", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2002]"));
}

#[test]
fn remove_self_loop_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("depgraph.toml"),
        "[[edges]]\nfrom = \"a\"\nto = \"a\"\n",
    )
    .expect("write manifest");

    dg_cmd(dir.path())
        .args(["remove", "a", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2003]"));
}

#[test]
fn prune_is_a_single_leaf_pass() {
    let dir = setup();
    let json = dg_json(dir.path(), &["prune"]);
    assert_eq!(strings(&json["removed"]), vec!["one", "island"]);
    assert_eq!(json["remaining"], 7);
}

#[test]
fn prune_keeps_excluded_roots() {
    let dir = setup();
    let json = dg_json(dir.path(), &["prune", "--keep", "one"]);
    assert_eq!(strings(&json["removed"]), vec!["island"]);
    assert_eq!(strings(&json["kept"]), vec!["one"]);
    assert_eq!(json["remaining"], 8);
}

#[test]
fn prune_pretty_summary() {
    let dir = setup();
    dg_cmd(dir.path())
        .args(["prune", "--keep", "one", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pruned 1 node(s)"))
        .stdout(predicate::str::contains("  - island"));
}
