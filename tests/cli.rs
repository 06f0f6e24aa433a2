use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// 构建测试目录树: a.txt、b.log、nested/c.txt
fn build_tree(root: &std::path::Path) {
    fs::write(root.join("a.txt"), "aaa").unwrap();
    fs::write(root.join("b.log"), "bbb").unwrap();
    fs::create_dir(root.join("nested")).unwrap();
    fs::write(root.join("nested").join("c.txt"), "ccc").unwrap();
}

#[test]
fn test_extension_and_timespan_filter() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    let mut cmd = Command::cargo_bin("FindRecent").unwrap();
    cmd.arg("-d").arg(dir.path())
        .arg("-e").arg("txt")
        .arg("-t").arg("10m");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("c.txt"))
        .stdout(predicate::str::contains("b.log").not());
}

#[test]
fn test_exclude_filter() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    let mut cmd = Command::cargo_bin("FindRecent").unwrap();
    cmd.arg("-d").arg(dir.path())
        .arg("-x").arg("nested");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("b.log"))
        .stdout(predicate::str::contains("c.txt").not());
}

#[test]
fn test_include_filter_is_case_insensitive() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    let mut cmd = Command::cargo_bin("FindRecent").unwrap();
    cmd.arg("-d").arg(dir.path())
        .arg("-i").arg("NESTED");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("c.txt"))
        .stdout(predicate::str::contains("a.txt").not());
}

#[test]
fn test_no_filters_reports_all_files() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    let mut cmd = Command::cargo_bin("FindRecent").unwrap();
    cmd.arg("-d").arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("未指定文件扩展名，将搜索所有文件。"))
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("b.log"))
        .stdout(predicate::str::contains("c.txt"));
}

#[test]
fn test_multiple_directories() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    fs::write(dir_a.path().join("one.txt"), "1").unwrap();
    fs::write(dir_b.path().join("two.txt"), "2").unwrap();

    let mut cmd = Command::cargo_bin("FindRecent").unwrap();
    cmd.arg("-d").arg(dir_a.path())
        .arg("-d").arg(dir_b.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("one.txt"))
        .stdout(predicate::str::contains("two.txt"));
}

#[test]
fn test_invalid_timespan_aborts_before_traversal() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    let mut cmd = Command::cargo_bin("FindRecent").unwrap();
    cmd.arg("-d").arg(dir.path())
        .arg("-t").arg("5x");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("无效的时间范围格式"))
        .stdout(predicate::str::contains("a.txt").not());
}

#[test]
fn test_config_file_supplies_default_excludes() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    let config_path = dir.path().join("findrecent.toml");
    fs::write(
        &config_path,
        "[search]\ndefault_directory = \"/\"\nrespect_gitignore = false\n\n[exclude]\ndefault_paths = [\"nested\"]\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("FindRecent").unwrap();
    cmd.arg("-d").arg(dir.path())
        .arg("-x").arg("findrecent.toml")
        .arg("--config").arg(&config_path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("c.txt").not());
}
