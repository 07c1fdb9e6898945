//! # Drupal Dockerizer Project Configuration Builder
//!
//! File: cli/src/core/builder.rs
//!
//! ## Overview
//!
//! Turns the `init` flags and facts about the host (current directory, OS
//! family, user id) into a `ProjectConfiguration`, plus the companion VS Code
//! debugger configuration.
//!
//! ## Workflow
//!
//! 1. The current directory must contain `index.php` (the Drupal web root).
//! 2. Its parent is the project root; no sidecar may exist there yet.
//! 3. Project name = parent directory name, domain = name + suffix.
//! 4. Defaults are applied, then the flags override them.
//! 5. Networking: bridge mode on Linux or with `--network` (a free network
//!    index is probed); localhost mode otherwise (the HTTP port must be free).
//! 6. `write_project_files` writes `.vscode/launch.json` and the sidecar.
//!
use crate::common::fs::io as fsio;
use crate::common::network::probe::{self, Probe};
use crate::common::system::host::OsKind;
use crate::core::config::Settings;
use crate::core::error::{DockerizerError, Result};
use crate::core::project::{NetworkMode, ProjectConfiguration, CONFIG_FILENAME};
use anyhow::{anyhow, Context};
use clap::Args;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File whose presence marks a Drupal web root.
pub const DRUPAL_MARKER_FILE: &str = "index.php";
/// Debugger configuration, relative to the project root.
pub const DEBUG_CONFIG_RELATIVE_PATH: &str = ".vscode/launch.json";

const DEFAULT_DRUSH_COMMANDS: [&str; 3] = ["cc drush", "cr", "cron"];
const SOLR_DRUSH_COMMANDS: [&str; 2] = ["sapi-r", "sapi-i"];
const DEFAULT_SOLR_VERSION: u8 = 4;
const DEFAULT_NETWORK_ID: u8 = 2;
const CUSTOM_DRUPAL_SETTINGS: &str = "if (file_exists($app_root . '/' . $site_path . '/settings.local.php')) {
    include $app_root . '/' . $site_path . '/settings.local.php';
  }
  ";
const XDEBUG_LOCALHOST: &str = "remote_enable=1 remote_connect_back=0 remote_host=10.254.254.254 remote_port=9000 show_error_trace=0 show_local_vars=1 remote_autostart=1 show_exception_trace=0 idekey=VSCODE";

/// Flags accepted by `init` (and `standard-install`).
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// Enable Solr search with the given major version (4-8).
    #[arg(long, value_name = "VERSION", value_parser = clap::value_parser!(u8).range(4..=8))]
    pub solr: Option<u8>,

    /// Path to custom Solr configs.
    #[arg(long = "solr-configs", value_name = "PATH")]
    pub solr_configs: Option<PathBuf>,

    /// Install memcache.
    #[arg(long)]
    pub memcache: bool,

    /// Install adminer.
    #[arg(long)]
    pub adminer: bool,

    /// PHP image version tag.
    #[arg(long, value_name = "VERSION")]
    pub php: Option<String>,

    /// Drush major version.
    #[arg(long = "drush_version", alias = "drush-version", value_name = "VERSION")]
    pub drush_version: Option<u8>,

    /// Use a dedicated bridge network for the containers (always on for Linux).
    #[arg(long)]
    pub network: bool,

    /// Path to the SSL certificate (requires --ssl-key).
    #[arg(long = "ssl-cert", value_name = "PATH")]
    pub ssl_cert: Option<PathBuf>,

    /// Path to the SSL certificate private key (requires --ssl-cert).
    #[arg(long = "ssl-key", value_name = "PATH")]
    pub ssl_key: Option<PathBuf>,
}

/// Facts about the machine and invocation the configuration depends on.
#[derive(Debug, Clone)]
pub struct HostFacts {
    pub cwd: PathBuf,
    pub os: OsKind,
    pub uid: u32,
}

/// Builds project configurations from `init` flags.
pub struct ProjectConfigBuilder<'a> {
    settings: &'a Settings,
    probe: &'a dyn Probe,
}

impl<'a> ProjectConfigBuilder<'a> {
    pub fn new(settings: &'a Settings, probe: &'a dyn Probe) -> Self {
        Self { settings, probe }
    }

    /// Builds the configuration for the web root `host.cwd`.
    ///
    /// The project root is the parent of the web root; its directory name
    /// becomes the compose project name. Nothing is written to disk.
    ///
    /// # Arguments
    ///
    /// * `options` - The `init` flags (PHP version, network mode, Solr, ...)
    /// * `host` - Facts about the invoking host: web root, OS and user ids
    ///
    /// # Returns
    ///
    /// * `Result<ProjectConfiguration>` - The configuration ready to be saved
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - `index.php` is missing from the web root (`NotADrupalRoot`)
    /// - The project already has a sidecar (`ConfigAlreadyExists`)
    /// - Localhost mode finds the HTTP port taken (`PortUnavailable`)
    pub fn build(&self, options: &InitOptions, host: &HostFacts) -> Result<ProjectConfiguration> {
        // The web root must look like a Drupal checkout.
        let web_root_dir = &host.cwd;
        if !web_root_dir.join(DRUPAL_MARKER_FILE).is_file() {
            anyhow::bail!(DockerizerError::NotADrupalRoot {
                dir: web_root_dir.clone(),
            });
        }
        let (root_dir, web_root) = match (web_root_dir.parent(), web_root_dir.file_name()) {
            (Some(parent), Some(name)) => (parent.to_path_buf(), name.to_string_lossy().into_owned()),
            _ => anyhow::bail!(DockerizerError::NotADrupalRoot {
                dir: web_root_dir.clone(),
            }),
        };
        if !root_dir.join(&web_root).is_dir() {
            anyhow::bail!(DockerizerError::NotADrupalRoot {
                dir: web_root_dir.clone(),
            });
        }

        // One sidecar per project root.
        let config_path = root_dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            anyhow::bail!(DockerizerError::ConfigAlreadyExists { path: config_path });
        }

        let project_name = root_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                anyhow!(DockerizerError::InvalidConfig(format!(
                    "Cannot derive a project name from '{}'",
                    root_dir.display()
                )))
            })?;
        let domain_name = format!("{}{}", project_name, self.settings.domain_suffix);
        debug!("Project '{}' at {}", project_name, root_dir.display());

        let mut drush_commands: Vec<String> =
            DEFAULT_DRUSH_COMMANDS.iter().map(|c| c.to_string()).collect();
        if options.solr.is_some() {
            drush_commands.extend(SOLR_DRUSH_COMMANDS.iter().map(|c| c.to_string()));
        }

        let (ssl_cert_path, ssl_key_path) = match (&options.ssl_cert, &options.ssl_key) {
            (Some(cert), Some(key)) => (
                Some(absolutize(cert, web_root_dir)),
                Some(absolutize(key, web_root_dir)),
            ),
            (None, None) => (None, None),
            _ => {
                warn!("SSL needs both --ssl-cert and --ssl-key; SSL stays disabled.");
                (None, None)
            }
        };

        let network_mode = if host.os.forces_bridge_networking() || options.network {
            let network_id =
                probe::select_free_network_index(self.probe, self.settings.probe_port);
            NetworkMode::Bridge { network_id }
        } else {
            probe::ensure_local_port_free(self.probe, self.settings.http_port)?;
            NetworkMode::Localhost
        };
        let (advanced_networking, network_id) = match network_mode {
            NetworkMode::Bridge { network_id } => (true, network_id),
            NetworkMode::Localhost => (false, DEFAULT_NETWORK_ID),
        };

        let config = ProjectConfiguration {
            user_uid: host.uid,
            compose_project_name: project_name.clone(),
            docker_runtime_dir: project_name,
            drupal_root_dir: root_dir,
            drupal_web_root: web_root,
            drupal_files_dir: web_root_dir.join("sites").join("default").join("files"),
            advanced_networking,
            network_id,
            domain_name,
            xdebug_environment: xdebug_environment(network_mode),
            solr: options.solr.is_some(),
            solr_version: options.solr.unwrap_or(DEFAULT_SOLR_VERSION),
            solr_configs_path: options
                .solr_configs
                .as_ref()
                .map(|p| absolutize(p, web_root_dir)),
            memcache: options.memcache,
            install_adminer: options.adminer,
            drush_commands,
            drush_version: options.drush_version.unwrap_or(self.settings.drush_version),
            custom_drupal_settings: CUSTOM_DRUPAL_SETTINGS.to_string(),
            phpversion: options
                .php
                .clone()
                .unwrap_or_else(|| self.settings.php_version.clone()),
            ssl_enabled: ssl_cert_path.is_some(),
            ssl_cert_path,
            ssl_key_path,
            db_dump_path: None,
        };
        config.validate()?;
        info!(
            "Built configuration for '{}' ({:?})",
            config.compose_project_name, network_mode
        );
        Ok(config)
    }
}

/// Xdebug settings passed to the PHP container.
pub fn xdebug_environment(mode: NetworkMode) -> String {
    match mode {
        NetworkMode::Bridge { network_id } => format!(
            "remote_enable=1 remote_connect_back=1 remote_port=9000 remote_host={} show_error_trace=0 show_local_vars=1 remote_autostart=1 show_exception_trace=0 idekey=VSCODE",
            probe::gateway_address(network_id)
        ),
        NetworkMode::Localhost => XDEBUG_LOCALHOST.to_string(),
    }
}

/// VS Code "Listen for XDebug" launch configuration.
///
/// Bridge mode adds the gateway address the debugger listens on.
pub fn debugger_config(mode: NetworkMode) -> Value {
    let mut configuration = json!({
        "name": "Listen for XDebug",
        "type": "php",
        "request": "launch",
        "pathMappings": {
            "/var/www": "${workspaceFolder}"
        },
        "port": 9000,
        "xdebugSettings": {
            "show_hidden": 1,
            "max_data": -1,
            "max_depth": 2,
            "max_children": 100
        }
    });
    if let NetworkMode::Bridge { network_id } = mode {
        configuration["hostname"] = json!(probe::gateway_address(network_id).to_string());
    }
    json!({
        "version": "0.2.0",
        "configurations": [configuration]
    })
}

/// Writes the debugger configuration and then the sidecar for `config`.
///
/// When the sidecar cannot be written, a `launch.json` created by this call
/// is removed again so a retried `init` starts clean.
///
/// # Arguments
///
/// * `config` - The configuration returned by `ProjectConfigBuilder::build`
///
/// # Errors
///
/// Returns an `Err` if either file cannot be serialized or written.
pub fn write_project_files(config: &ProjectConfiguration) -> Result<()> {
    // Remember whether launch.json predates us so a rollback never deletes user files.
    let debug_path = config.drupal_root_dir.join(DEBUG_CONFIG_RELATIVE_PATH);
    let debug_existed = debug_path.exists();
    let debug_json = serde_json::to_string_pretty(&debugger_config(config.network_mode()))
        .context("Failed to serialize debugger configuration")?;
    fsio::write_string_atomic(&debug_path, &debug_json)
        .context("Failed to write debugger configuration")?;
    info!("Wrote debugger configuration to {}", debug_path.display());

    // The sidecar goes last; its presence marks a finished init.
    if let Err(e) = config.save(&config.config_path()) {
        if !debug_existed {
            if let Err(rm_err) = std::fs::remove_file(&debug_path) {
                warn!(
                    "Could not remove {} after failed init: {}",
                    debug_path.display(),
                    rm_err
                );
            }
        }
        return Err(e.context("Failed to write project configuration"));
    }
    Ok(())
}

/// Expands `~` and resolves relative paths against `base`.
///
/// # Arguments
///
/// * `path` - A path as typed by the user
/// * `base` - The directory relative paths are taken from
///
/// # Returns
///
/// * `PathBuf` - An absolute path when `base` is absolute; the path is not
///   required to exist
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
