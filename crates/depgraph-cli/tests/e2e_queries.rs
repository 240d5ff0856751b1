//! E2E tests for the read-only `dg` commands against a manifest on disk.
//!
//! Covers `nodes`, `edges`, `tree`, `up`, `find`, `paths`, `cycles` and
//! `order` in JSON and text modes, plus the structured error output.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

/// ```text
/// app -> core -> util
///  |      ^
///  +-> log -> util
/// docs (isolated)
/// ```
const MANIFEST: &str = r#"
nodes = ["docs"]

[defaults]
kind = "compile"

[[edges]]
from = "app"
to = "core"

[[edges]]
from = "app"
to = "log"
kind = "runtime"

[[edges]]
from = "core"
to = "util"

[[edges]]
from = "log"
to = "util"
kind = "runtime"
"#;

const CYCLIC: &str = r#"
[[edges]]
from = "a"
to = "b"

[[edges]]
from = "b"
to = "c"

[[edges]]
from = "c"
to = "a"
"#;

fn write_manifest(content: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("depgraph.toml"), content).expect("write manifest");
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

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn nodes_lists_manifest_order() {
    let dir = write_manifest(MANIFEST);
    let json = dg_json(dir.path(), &["nodes"]);

    assert_eq!(json["count"], 5);
    assert_eq!(json["edges"], 4);
    let names: Vec<&str> = json["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|n| n["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["app", "core", "log", "util", "docs"]);
}

#[test]
fn edges_outbound_and_inbound() {
    let dir = write_manifest(MANIFEST);

    let json = dg_json(dir.path(), &["edges", "app"]);
    assert_eq!(json["direction"], "outbound");
    assert_eq!(json["edges"][0]["destination"], "core");
    assert_eq!(json["edges"][0]["value"], "compile");
    assert_eq!(json["edges"][1]["destination"], "log");
    assert_eq!(json["edges"][1]["value"], "runtime");

    let json = dg_json(dir.path(), &["edges", "util", "--inbound"]);
    assert_eq!(json["direction"], "inbound");
    assert_eq!(json["edges"].as_array().map(Vec::len), Some(2));
}

#[test]
fn edges_of_unknown_node_is_an_error() {
    let dir = write_manifest(MANIFEST);
    dg_cmd(dir.path())
        .args(["edges", "ghost", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2002]"))
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn tree_text_reports_depth_and_kind() {
    let dir = write_manifest(MANIFEST);
    dg_cmd(dir.path())
        .args(["tree", "app", "--format", "text"])
        .assert()
        .success()
        .stdout(
            "1\tapp\tcore\tcompile\n\
             2\tcore\tutil\tcompile\n\
             1\tapp\tlog\truntime\n\
             2\tlog\tutil\truntime\n",
        );
}

#[test]
fn tree_once_and_kind_filter() {
    let dir = write_manifest(MANIFEST);

    let json = dg_json(dir.path(), &["tree", "app", "--once"]);
    let destinations: Vec<&str> = json["visits"]
        .as_array()
        .expect("visits")
        .iter()
        .map(|v| v["destination"].as_str().expect("destination"))
        .collect();
    assert_eq!(destinations, vec!["core", "util", "log"]);

    let json = dg_json(dir.path(), &["tree", "app", "--kind", "runtime"]);
    let visits = json["visits"].as_array().expect("visits");
    assert_eq!(visits.len(), 2);
    assert!(visits.iter().all(|v| v["kind"] == "runtime"));
    assert_eq!(visits[0]["last"], true);
}

#[test]
fn tree_pretty_draws_branches() {
    let dir = write_manifest(MANIFEST);
    dg_cmd(dir.path())
        .args(["tree", "app", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("├── core (compile)"))
        .stdout(predicate::str::contains("└── log (runtime)"));
}

#[test]
fn tree_of_unknown_root_is_invalid_root() {
    let dir = write_manifest(MANIFEST);
    let output = dg_cmd(dir.path())
        .args(["tree", "ghost", "--json"])
        .output()
        .expect("dg should not crash");
    assert!(!output.status.success());

    let json: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert_eq!(json["error"]["error_code"], "E2001");
    assert!(output.stdout.is_empty());
}

#[test]
fn up_lists_deepest_first() {
    let dir = write_manifest(MANIFEST);
    let json = dg_json(dir.path(), &["up", "app"]);
    let first = &json["visits"][0];
    assert_eq!(first["origin"], "core");
    assert_eq!(first["destination"], "util");
    assert_eq!(first["depth"], 2);
}

#[test]
fn find_substring_and_exact() {
    let dir = write_manifest(MANIFEST);

    let json = dg_json(dir.path(), &["find", "app", "ti"]);
    assert_eq!(json["found"], "util");

    let json = dg_json(dir.path(), &["find", "app", "co", "--exact"]);
    assert_eq!(json["found"], Value::Null);

    let json = dg_json(dir.path(), &["find", "log", "app"]);
    assert_eq!(json["found"], Value::Null);
}

#[test]
fn paths_in_discovery_order() {
    let dir = write_manifest(MANIFEST);
    let json = dg_json(dir.path(), &["paths", "app", "util"]);
    let paths = json["paths"].as_array().expect("paths");
    assert_eq!(paths.len(), 2);
    assert_eq!(strings(&paths[0]), vec!["app", "core", "util"]);
    assert_eq!(strings(&paths[1]), vec!["app", "log", "util"]);

    dg_cmd(dir.path())
        .args(["paths", "app", "util", "--format", "text"])
        .assert()
        .success()
        .stdout("app -> core -> util\napp -> log -> util\n");
}

#[test]
fn order_puts_dependencies_first() {
    let dir = write_manifest(MANIFEST);
    let json = dg_json(dir.path(), &["order"]);
    assert_eq!(
        strings(&json["order"]),
        vec!["util", "core", "log", "app", "docs"]
    );
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

#[test]
fn cycles_reported_and_order_refused() {
    let dir = write_manifest(CYCLIC);

    let json = dg_json(dir.path(), &["cycles"]);
    assert_eq!(strings(&json["cycles"][0]), vec!["a", "b", "c"]);

    dg_cmd(dir.path())
        .args(["order", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2003]"))
        .stderr(predicate::str::contains("suggestion:"));

    dg_cmd(dir.path())
        .args(["tree", "a", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("the graph has a cycle"));
}

#[test]
fn no_cycles_in_acyclic_manifest() {
    let dir = write_manifest(MANIFEST);
    dg_cmd(dir.path())
        .args(["cycles", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependency cycles found."));
}

// ---------------------------------------------------------------------------
// Manifest handling
// ---------------------------------------------------------------------------

#[test]
fn missing_manifest_fails_cleanly() {
    let dir = TempDir::new().expect("tempdir");
    dg_cmd(dir.path())
        .args(["nodes", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read manifest"));
}

#[test]
fn invalid_manifest_reports_code() {
    let dir = write_manifest("[[edges]]\nfrom = \"\"\nto = \"b\"\n");
    dg_cmd(dir.path())
        .args(["nodes", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1002]"))
        .stderr(predicate::str::contains("edge #0"));
}

#[test]
fn manifest_flag_overrides_location() {
    let dir = TempDir::new().expect("tempdir");
    let nested = dir.path().join("deps");
    std::fs::create_dir(&nested).expect("mkdir");
    std::fs::write(nested.join("build.toml"), MANIFEST).expect("write");

    let json = dg_json(dir.path(), &["nodes", "--manifest", "deps/build.toml"]);
    assert_eq!(json["count"], 5);
}

#[test]
fn format_env_selects_json() {
    let dir = write_manifest(MANIFEST);
    let output = dg_cmd(dir.path())
        .env("FORMAT", "json")
        .args(["order"])
        .output()
        .expect("dg should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert!(json["order"].is_array());
}

#[test]
fn completions_do_not_need_a_manifest() {
    let dir = TempDir::new().expect("tempdir");
    dg_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dg"));
}
