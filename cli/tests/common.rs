//! # Drupal Dockerizer Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every test runs
//! the compiled binary against its own temporary config directory, seeded so
//! that the one-time required-tool check is already recorded and network
//! probes give up quickly.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CONFIG_DIR_ENV: &str = "DRUPAL_DOCKERIZER_CONFIG_DIR";

/// `assert_cmd::Command` for the compiled `drupal-dockerizer` binary.
pub fn dockerizer_cmd() -> Command {
    Command::cargo_bin("drupal-dockerizer").expect("Failed to find drupal-dockerizer binary")
}

/// A config directory with the tool check recorded and fast probe settings.
pub fn seeded_config_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create config dir");
    fs::write(
        dir.path().join("config.yml"),
        "instances: {}\nis_check_requirements_tools: true\nversion: 0.1.0\n",
    )
    .expect("Failed to seed config.yml");
    fs::write(
        dir.path().join("settings.toml"),
        "http_port = 1\nprobe_port = 1\nprobe_timeout_ms = 200\n",
    )
    .expect("Failed to seed settings.toml");
    dir
}

/// `dockerizer_cmd()` running in `cwd` with `config_dir` as its config directory.
pub fn dockerizer_in(cwd: &Path, config_dir: &TempDir) -> Command {
    let mut cmd = dockerizer_cmd();
    cmd.current_dir(cwd).env(CONFIG_DIR_ENV, config_dir.path());
    cmd
}

/// Creates `<base>/<name>/web/index.php` and returns the web root.
pub fn drupal_web_root(base: &Path, name: &str) -> PathBuf {
    let web = base.join(name).join("web");
    fs::create_dir_all(&web).expect("Failed to create web root");
    fs::write(web.join("index.php"), "<?php\n").expect("Failed to write index.php");
    web
}

/// Runs `init` in a fresh Drupal web root and returns the project root.
pub fn initialized_project(base: &Path, name: &str, config_dir: &TempDir) -> PathBuf {
    let web = drupal_web_root(base, name);
    dockerizer_in(&web, config_dir).arg("init").assert().success();
    base.join(name)
}
