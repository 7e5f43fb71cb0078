//! CLI integration tests

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

const REGISTRY: &str = "[zig]\nsubmodule = \"extensions/zig\"\nversion = \"0.3.0\"\n\n[astro]\nsubmodule = \"extensions/astro\"\nversion = \"1.0.0\"\n";

const GITMODULES: &str = "[submodule \"extensions/zig\"]\n\tpath = extensions/zig\n\turl = https://github.com/example/zig.git\n[submodule \"extensions/astro\"]\n\tpath = extensions/astro\n\turl = https://github.com/example/astro.git\n";

fn fixture(registry: &str, gitmodules: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("extensions.toml"), registry).unwrap();
    std::fs::write(dir.path().join(".gitmodules"), gitmodules).unwrap();
    dir
}

fn extpub() -> Command {
    let mut cmd = Command::cargo_bin("extpub").unwrap();
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_root_help() {
    extpub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Validate, package and publish editor extensions"))
        .stdout(predicate::str::contains("--keep-going"));
}

#[test]
fn test_version() {
    extpub()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_exits_one() {
    extpub()
        .arg("--no-such-flag")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--no-such-flag"));
}

#[test]
fn test_unknown_strategy_exits_one() {
    extpub().args(["--strategy", "everything"]).assert().code(1);
}

#[test]
fn test_sort_help() {
    extpub()
        .args(["sort", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sort the registry"));
}

#[test]
fn test_validate_help() {
    extpub()
        .args(["validate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--reference"));
}

#[test]
fn test_validate_valid_registry() {
    let dir = fixture(REGISTRY, GITMODULES);
    extpub()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 extension(s) valid"));
}

#[test]
fn test_validate_reports_error_code() {
    let dir = fixture(
        "[Bad_Id]\nsubmodule = \"extensions/Bad_Id\"\nversion = \"1.0.0\"\n",
        "",
    );
    extpub()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[REG001]"));
}

#[test]
fn test_validate_missing_registry() {
    let dir = TempDir::new().unwrap();
    extpub()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error["));
}

#[test]
fn test_sort_rewrites_files() {
    let dir = fixture(REGISTRY, GITMODULES);
    extpub()
        .current_dir(dir.path())
        .arg("sort")
        .assert()
        .success();

    let registry = std::fs::read_to_string(dir.path().join("extensions.toml")).unwrap();
    assert!(registry.find("[astro]").unwrap() < registry.find("[zig]").unwrap());

    extpub()
        .current_dir(dir.path())
        .arg("sort")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already sorted"));
}

#[test]
fn test_unpublished_strategy_requires_credentials() {
    let dir = fixture(REGISTRY, GITMODULES);
    extpub()
        .current_dir(dir.path())
        .env_remove("S3_ACCESS_KEY")
        .env_remove("S3_SECRET_KEY")
        .env_remove("S3_BUCKET")
        .args(["--strategy", "unpublished"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("S3_ACCESS_KEY"));
}
