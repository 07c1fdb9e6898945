//! # Drupal Dockerizer Lifecycle Integration Tests
//!
//! File: cli/tests/lifecycle.rs
//!
//! ## Overview
//!
//! `up`, `stop`, `import-db`, `projects` and `project` against an initialized
//! project. Commands that would provision containers run with `--dry-run`,
//! which prints the external invocations and leaves the registry alone.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_up_dry_run_prints_provisioning() {
    let config_dir = seeded_config_dir();
    let base = tempfile::tempdir().unwrap();
    let root = initialized_project(base.path(), "blog", &config_dir);

    dockerizer_in(&root, &config_dir)
        .args(["up", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ansible-pull"))
        .stdout(predicate::str::contains("main.yml"))
        .stdout(predicate::str::contains("--ask-become-pass"))
        .stdout(predicate::str::contains("Project is up."));

    let registry = fs::read_to_string(config_dir.path().join("config.yml")).unwrap();
    assert!(!registry.contains("blog"));
}

#[test]
fn test_drush_dry_run_from_web_root() {
    let config_dir = seeded_config_dir();
    let base = tempfile::tempdir().unwrap();
    let root = initialized_project(base.path(), "blog", &config_dir);

    dockerizer_in(&root.join("web"), &config_dir)
        .args(["--dry-run", "drush", "status", "--fields=bootstrap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docker exec --interactive blog-7.4-develop drush status --fields=bootstrap"));
}

#[test]
fn test_drush_own_flags_reach_drush() {
    let config_dir = seeded_config_dir();
    let base = tempfile::tempdir().unwrap();
    let root = initialized_project(base.path(), "blog", &config_dir);

    dockerizer_in(&root, &config_dir)
        .args(["--dry-run", "drush", "--version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blog-7.4-develop drush --version"));
}

#[test]
fn test_composer_version_shorthand_dry_run() {
    let config_dir = seeded_config_dir();
    let dir = tempfile::tempdir().unwrap();
    dockerizer_in(dir.path(), &config_dir)
        .args(["--dry-run", "composer:2", "install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("composer:2 --no-cache --ignore-platform-reqs install"));
}

#[test]
fn test_import_db_validates_dump() {
    let config_dir = seeded_config_dir();
    let base = tempfile::tempdir().unwrap();
    let root = initialized_project(base.path(), "blog", &config_dir);
    fs::write(root.join("dump.zip"), "x").unwrap();

    dockerizer_in(&root, &config_dir)
        .args(["import-db", "dump.zip"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sql"));
    dockerizer_in(&root, &config_dir)
        .args(["import-db", "missing.sql"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
    // Nothing stored yet, nothing to reuse.
    dockerizer_in(&root, &config_dir)
        .arg("import-db")
        .assert()
        .code(1);
}

#[test]
fn test_import_db_dry_run_keeps_config() {
    let config_dir = seeded_config_dir();
    let base = tempfile::tempdir().unwrap();
    let root = initialized_project(base.path(), "blog", &config_dir);
    fs::write(root.join("dump.sql"), "-- dump").unwrap();

    dockerizer_in(&root, &config_dir)
        .args(["--dry-run", "import-db", "dump.sql"])
        .assert()
        .success()
        .stdout(predicate::str::contains("db.yml"));
    let sidecar = fs::read_to_string(root.join(".drupal_dockerizer.yml")).unwrap();
    assert!(!sidecar.contains("db_dump_path"));
}

#[test]
fn test_projects_lists_registry() {
    let config_dir = seeded_config_dir();
    fs::write(
        config_dir.path().join("config.yml"),
        "instances:\n  blog:\n    instance: blog\n    root_dir: /srv/blog\n    domain: blog.devel\n    status: stop\nis_check_requirements_tools: true\nversion: 0.1.0\n",
    )
    .unwrap();

    dockerizer_in(config_dir.path(), &config_dir)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("Status projects:"))
        .stdout(predicate::str::contains("blog is stop, domain blog.devel"));
}

#[test]
fn test_project_unknown_name_fails() {
    let config_dir = seeded_config_dir();
    dockerizer_in(config_dir.path(), &config_dir)
        .args(["project", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ghost"));
}
