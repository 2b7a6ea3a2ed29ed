//! Integration tests for the xfind CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// a/x.go, a/y.txt, b/z.go
fn make_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir_all(base.join("a")).unwrap();
    fs::create_dir_all(base.join("b")).unwrap();
    fs::write(base.join("a/x.go"), "package a\n// TODO: refactor\n").unwrap();
    fs::write(base.join("a/y.txt"), "notes\n").unwrap();
    fs::write(base.join("b/z.go"), "package b\n// TODO: test\n// TODO: docs\n").unwrap();
    temp_dir
}

fn root(temp_dir: &TempDir) -> PathBuf {
    std::path::absolute(temp_dir.path()).unwrap()
}

fn xfind() -> Command {
    let mut cmd = Command::cargo_bin("xfind").unwrap();
    cmd.env_remove("XFIND_WORKDIR")
        .env_remove("XFIND_SHELL")
        .env_remove("XFIND_SHELL_FLAG")
        .env_remove("RUST_LOG");
    cmd
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    xfind()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("-exec <action>"))
        .stdout(predicate::str::contains("countmatch"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    xfind()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xfind"));
}

#[test]
fn test_missing_flags_prints_usage() {
    let tree = make_tree();
    xfind()
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_invalid_type_names_flag() {
    let tree = make_tree();
    xfind()
        .arg(tree.path())
        .args(["-name", "*.go", "-type"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("-type"));
}

#[test]
fn test_unexpected_parameter_fails() {
    let tree = make_tree();
    xfind()
        .arg(tree.path())
        .args(["stray", "-name", "*.go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument (0): stray"));
}

#[test]
fn test_print_matching_files() {
    let tree = make_tree();
    let root = root(&tree);
    let expected = format!(
        "{}\n{}\n",
        root.join("a/x.go").display(),
        root.join("b/z.go").display()
    );

    xfind()
        .arg(tree.path())
        .args(["-name", "*.go", "-exec", "print", "{}"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_directory_placeholder_fires_once() {
    let tree = make_tree();
    let root = root(&tree);
    let expected = format!("{}\n{}\n", root.join("a").display(), root.join("b").display());

    xfind()
        .arg(tree.path())
        .args(["-type", "file", "-exec", "print", "[]"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_count_and_match_lines() {
    let tree = make_tree();
    xfind()
        .arg(tree.path())
        .args(["-match", "TODO", "-exec", "count", "-exec", "countmatch", "-exec", "countlines"])
        .assert()
        .success()
        .stdout("file total: 2\nline total: 5\nline matches: 3\n");
}

#[test]
fn test_printmatch_with_regex_group() {
    let tree = make_tree();
    xfind()
        .arg(tree.path())
        .args(["-name", "z.go", "-regex", "TODO: (\\w+)", "-exec", "printmatch"])
        .assert()
        .success()
        .stdout("    2: test\n    3: docs\n");
}

#[test]
fn test_exclude_prunes_directory() {
    let tree = make_tree();
    let root = root(&tree);

    xfind()
        .arg(tree.path())
        .args(["-type", "file", "-exclude", "a", "-exec", "print", "{}"])
        .assert()
        .success()
        .stdout(format!("{}\n", root.join("b/z.go").display()));
}

#[test]
fn test_debug_delete_keeps_files() {
    let tree = make_tree();
    let root = root(&tree);

    xfind()
        .arg(tree.path())
        .args(["-name", "*.txt", "-debug", "-delete"])
        .assert()
        .success()
        .stdout(format!("delete {}\n", root.join("a/y.txt").display()));

    assert!(tree.path().join("a/y.txt").exists());
}

#[test]
fn test_delete_removes_matches() {
    let tree = make_tree();
    let root = root(&tree);

    xfind()
        .arg(tree.path())
        .args(["-name", "b", "-type", "dir", "-delete"])
        .assert()
        .success()
        .stdout(format!("Delete folder {}\n", root.join("b").display()));

    assert!(!tree.path().join("b").exists());
    assert!(tree.path().join("a/x.go").exists());
}

#[test]
fn test_missing_root_fails() {
    let tree = make_tree();
    xfind()
        .arg(tree.path().join("nope"))
        .args(["-exec", "count"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("walk failed"));
}

#[cfg(unix)]
#[test]
fn test_external_command_output() {
    let tree = make_tree();
    let root = root(&tree);

    xfind()
        .current_dir(tree.path())
        .arg(tree.path())
        .args(["-name", "*.txt", "-exec", "echo", "found", "{}"])
        .assert()
        .success()
        .stdout(format!("found {}\n", root.join("a/y.txt").display()));
}

#[cfg(unix)]
#[test]
fn test_external_command_uses_workdir() {
    let tree = make_tree();
    let root = root(&tree);

    xfind()
        .env("XFIND_WORKDIR", root.join("b"))
        .arg(tree.path())
        .args(["-name", "x.go", "-exec", "ls"])
        .assert()
        .success()
        .stdout("z.go\n");
}

#[test]
fn test_exec_rejects_more_than_100_params() {
    let tree = make_tree();
    let params: Vec<String> = (0..101).map(|i| format!("arg{i}")).collect();

    xfind()
        .arg(tree.path())
        .arg("-exec")
        .args(&params)
        .assert()
        .failure()
        .stderr(predicate::str::contains("'-exec'").and(predicate::str::contains("got 101")));
}

#[test]
fn test_parent_dir_root_matches_by_name() {
    let tree = make_tree();
    let root = root(&tree);
    let name = root.file_name().unwrap().to_string_lossy().into_owned();

    xfind()
        .arg(tree.path().join("a").join(".."))
        .args(["-name", name.as_str(), "-exec", "print", "{}"])
        .assert()
        .success()
        .stdout(format!("{}\n", root.display()));
}

#[cfg(unix)]
#[test]
fn test_external_command_gets_path_with_quote_and_space() {
    let temp_dir = TempDir::new().unwrap();
    let file = root(&temp_dir).join("q\"uo te.txt");
    fs::write(&file, "").unwrap();

    xfind()
        .arg(temp_dir.path())
        .args(["-name", "*.txt", "-exec", "echo", "{}"])
        .assert()
        .success()
        .stdout(format!("{}\n", file.display()));
}

#[cfg(target_os = "linux")]
#[test]
fn test_external_command_removes_non_utf8_path() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join(OsStr::from_bytes(b"bad\xff.txt"));
    fs::write(&file, "").unwrap();

    xfind()
        .arg(temp_dir.path())
        .args(["-name", "*.txt", "-exec", "rm", "{}"])
        .assert()
        .success();

    assert!(!file.exists());
}
