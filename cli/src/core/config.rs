//! # Drupal Dockerizer Tool Settings
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the tool-wide settings: where the playbooks come from,
//! which domain suffix new projects get, which port localhost mode needs, how
//! long network probes may block, and the defaults applied by `init`.
//!
//! Settings are optional. When `<config dir>/settings.toml` is absent every
//! value falls back to its built-in default, which matches what the playbooks
//! expect.
//!
//! ## Architecture
//!
//! - `resolve_config_dir`: picks the per-user config directory (overridable).
//! - `Settings`: the deserialized TOML document with per-field defaults.
//! - `load_settings`: reads, parses and validates the file if present.
//!
//! ## Example `settings.toml`
//!
//! ```toml
//! playbook_ref = "main"
//! domain_suffix = ".localhost"
//! probe_timeout_ms = 500
//! required_tools = ["ansible", "docker", "git"]
//! ```
//!
use crate::core::error::{DockerizerError, Result};
use anyhow::{anyhow, Context};
use directories::BaseDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

/// Directory name created under the platform's user config directory.
pub const APP_DIR_NAME: &str = "drupal_dockerizer";
const SETTINGS_FILENAME: &str = "settings.toml";

/// Tool-wide settings, loaded from `settings.toml`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Git repository `ansible-pull` checks the playbooks out from.
    #[serde(default = "default_playbook_repo")]
    pub playbook_repo: String,
    /// Branch or tag of the playbook repository.
    #[serde(default = "default_playbook_ref")]
    pub playbook_ref: String,
    /// Appended to the project name to form its domain.
    #[serde(default = "default_domain_suffix")]
    pub domain_suffix: String,
    /// Port the web container binds in localhost networking mode.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Port probed on candidate private networks.
    #[serde(default = "default_probe_port")]
    pub probe_port: u16,
    /// Connect timeout of a single probe attempt.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// PHP image tag used when `init` gets no `--php`.
    #[serde(default = "default_php_version")]
    pub php_version: String,
    /// Drush major version used when `init` gets no `--drush_version`.
    #[serde(default = "default_drush_version")]
    pub drush_version: u8,
    /// Programs that must be on PATH before any command runs.
    #[serde(default = "default_required_tools")]
    pub required_tools: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playbook_repo: default_playbook_repo(),
            playbook_ref: default_playbook_ref(),
            domain_suffix: default_domain_suffix(),
            http_port: default_http_port(),
            probe_port: default_probe_port(),
            probe_timeout_ms: default_probe_timeout_ms(),
            php_version: default_php_version(),
            drush_version: default_drush_version(),
            required_tools: default_required_tools(),
        }
    }
}

impl Settings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

fn default_playbook_repo() -> String {
    "https://github.com/jet-dev-team/drupal-dockerizer.git".to_string()
}
fn default_playbook_ref() -> String {
    "pre-release".to_string()
}
fn default_domain_suffix() -> String {
    ".devel".to_string()
}
fn default_http_port() -> u16 {
    80
}
fn default_probe_port() -> u16 {
    80
}
fn default_probe_timeout_ms() -> u64 {
    3000
}
fn default_php_version() -> String {
    "7.4-develop".to_string()
}
fn default_drush_version() -> u8 {
    8
}
fn default_required_tools() -> Vec<String> {
    ["ansible", "docker", "docker-compose", "git"]
        .iter()
        .map(|tool| tool.to_string())
        .collect()
}

/// Returns the directory holding the registry and settings files.
///
/// An explicit override (the `--config-dir` flag or the
/// `DRUPAL_DOCKERIZER_CONFIG_DIR` variable) wins; otherwise the platform's
/// user config directory is used, e.g. `~/.config/drupal_dockerizer` on Linux.
pub fn resolve_config_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
        debug!("Using config directory override: {}", expanded);
        return Ok(PathBuf::from(expanded));
    }
    let base = BaseDirs::new().ok_or_else(|| {
        anyhow!(DockerizerError::InvalidConfig(
            "Could not determine the user config directory.".to_string()
        ))
    })?;
    Ok(base.config_dir().join(APP_DIR_NAME))
}

/// Loads `settings.toml` from `config_dir`, or returns defaults if it is absent.
pub fn load_settings(config_dir: &Path) -> Result<Settings> {
    let path = config_dir.join(SETTINGS_FILENAME);
    let settings = if path.is_file() {
        info!("Loading settings from: {}", path.display());
        load_settings_from_path(&path)?
    } else {
        debug!("No settings file at {}, using defaults.", path.display());
        Settings::default()
    };
    validate_settings(&settings).context("Settings validation failed")?;
    debug!("Effective settings: {:?}", settings);
    Ok(settings)
}

fn load_settings_from_path(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.playbook_repo.trim().is_empty() {
        return Err(anyhow!(DockerizerError::InvalidConfig(
            "playbook_repo must not be empty.".to_string()
        )));
    }
    if !settings.domain_suffix.starts_with('.') || settings.domain_suffix.len() < 2 {
        return Err(anyhow!(DockerizerError::InvalidConfig(format!(
            "domain_suffix '{}' must start with '.', e.g. '.devel'.",
            settings.domain_suffix
        ))));
    }
    if settings.probe_timeout_ms == 0 {
        return Err(anyhow!(DockerizerError::InvalidConfig(
            "probe_timeout_ms must be greater than zero.".to_string()
        )));
    }
    Ok(())
}
