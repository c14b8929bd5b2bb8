//! Integration tests for the hql-splitter binary.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test config file.
fn create_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let config_path = dir.path().join("hql-splitter.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

/// Get a command with config path set via env var, run inside `dir`.
fn cmd_with_config(dir: &TempDir, config_path: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hql-splitter");
    cmd.env("HQL_SPLITTER_CONFIG", config_path);
    cmd.current_dir(dir.path());
    cmd
}

/// Get a command with no config at all.
fn cmd_without_config(dir: &TempDir) -> assert_cmd::Command {
    cmd_with_config(dir, &dir.path().join("nonexistent.toml"))
}

const DENY_CONFIG: &str = r#"
[[deny]]
kind = "query"
pattern = '(?i)^\s*drop\s+database'
reason = "Dropping databases is not allowed"
"#;

#[test]
fn test_split_stdin_text() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .write_stdin("foo;bar\nbaz -- comment with ;\n'fox;';\nlove")
        .assert()
        .success()
        .stdout("foo;\nbar\nbaz -- comment with ;\n'fox;';\nlove;\n");
}

#[test]
fn test_split_stdin_json() {
    let dir = TempDir::new().unwrap();
    let output = cmd_without_config(&dir)
        .arg("--json")
        .write_stdin("  !connect jdbc:foo\nselect 1;")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["text"], "  !connect jdbc:foo\n");
    assert_eq!(lines[0]["kind"], "meta");
    assert_eq!(lines[0]["command"], "connect");
    assert_eq!(lines[1]["text"], "select 1");
    assert_eq!(lines[1]["kind"], "query");
}

#[test]
fn test_json_from_config() {
    let dir = TempDir::new().unwrap();
    let config = create_config(&dir, "[output]\nformat = \"json\"\n");
    cmd_with_config(&dir, &config)
        .write_stdin("a;;b;")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""index":1"#))
        .stdout(predicate::str::contains(r#""text":"b""#));
}

#[test]
fn test_split_file() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("setup.hql");
    fs::write(&script, "create table t (a int);\ninsert into t values (1);\n").unwrap();

    cmd_without_config(&dir)
        .arg(&script)
        .assert()
        .success()
        .stdout("create table t (a int);\ninsert into t values (1);\n");
}

#[test]
fn test_empty_script() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .write_stdin(" ;; \n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_script_file() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .arg(dir.path().join("missing.hql"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read script"));
}

#[test]
fn test_reject_drop_database() {
    let dir = TempDir::new().unwrap();
    let config = create_config(&dir, DENY_CONFIG);
    cmd_with_config(&dir, &config)
        .write_stdin("use db;\nDROP DATABASE db;")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("REJECTED"))
        .stderr(predicate::str::contains("statement 1"));
}

#[test]
fn test_drop_in_comment_is_accepted() {
    let dir = TempDir::new().unwrap();
    let config = create_config(&dir, DENY_CONFIG);
    cmd_with_config(&dir, &config)
        .write_stdin("select 1 -- drop database db;\n;")
        .assert()
        .success();
}

#[test]
fn test_project_config_merged() {
    let dir = TempDir::new().unwrap();
    let config = create_config(&dir, "");
    fs::write(dir.path().join(".hql-splitter.toml"), DENY_CONFIG).unwrap();
    cmd_with_config(&dir, &config)
        .write_stdin("drop database db")
        .assert()
        .code(2);
}

#[test]
fn test_invalid_config_regex() {
    let dir = TempDir::new().unwrap();
    let config = create_config(
        &dir,
        "[[deny]]\npattern = '[invalid'\nreason = \"bad\"\n",
    );
    cmd_with_config(&dir, &config)
        .write_stdin("select 1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid regex"));
}

#[test]
fn test_invalid_config_toml() {
    let dir = TempDir::new().unwrap();
    let config = create_config(&dir, "overrides = [");
    cmd_with_config(&dir, &config)
        .write_stdin("select 1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse TOML"));
}

#[test]
fn test_run_log() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("runs.jsonl");
    let config = create_config(
        &dir,
        &format!(
            "[audit]\nenabled = true\npath = '{}'\n",
            log_path.display()
        ),
    );

    cmd_with_config(&dir, &config)
        .write_stdin("!connect jdbc:foo\nselect 1;select 2")
        .assert()
        .success();

    let content = fs::read_to_string(&log_path).unwrap();
    let entry: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(entry["source"], "<stdin>");
    assert_eq!(entry["statements"], 3);
    assert_eq!(entry["meta_commands"], 1);
    assert_eq!(entry["rejected"], false);
}

#[test]
fn test_context() {
    let dir = TempDir::new().unwrap();
    let config = create_config(
        &dir,
        "[overrides]\n\"hive.execution.engine\" = \"tez\"\n",
    );
    let basedir = dir.path().join("hive");

    let output = cmd_with_config(&dir, &config)
        .arg("--context")
        .arg(&basedir)
        .output()
        .unwrap();
    assert!(output.status.success());

    let ctx: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ctx["settings"]["hive.execution.engine"], "tez");
    assert_eq!(ctx["settings"]["hive.support.concurrency"], "false");
    assert!(basedir.join("warehouse").is_dir());
    assert!(basedir.join("tez_installation_dir").is_dir());
}

#[test]
fn test_unknown_option() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .arg("--bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_help_exits_zero() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--context"));
}

#[test]
fn test_context_equals_form() {
    let dir = TempDir::new().unwrap();
    let basedir = dir.path().join("hive");

    cmd_without_config(&dir)
        .arg(format!("--context={}", basedir.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("hive.metastore.warehouse.dir"));
    assert!(basedir.join("warehouse").is_dir());
}

#[test]
fn test_script_after_end_of_options() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("--odd.hql"), "select 1;select 2").unwrap();

    cmd_without_config(&dir)
        .args(["--", "--odd.hql"])
        .assert()
        .success()
        .stdout("select 1;\nselect 2;\n");
}

#[test]
fn test_open_quote_gets_no_terminator() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .write_stdin("select '--';select 'abc")
        .assert()
        .success()
        .stdout("select '--';\nselect 'abc\n");
}
