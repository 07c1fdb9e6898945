//! # Drupal Dockerizer Project Configuration
//!
//! File: cli/src/core/project.rs
//!
//! ## Overview
//!
//! Each provisioned Drupal project carries a sidecar YAML document,
//! `.drupal_dockerizer.yml`, in its root directory (the parent of the web
//! root). The playbooks receive it verbatim as Ansible extra vars, so the key
//! names below are part of the playbook contract and must not change.
//!
//! ## Architecture
//!
//! - `ProjectConfiguration`: the typed document plus its invariants.
//! - `NetworkMode`: the networking mode derived from `advanced_networking`.
//! - `find_config_path`: looks for the sidecar in a directory and its ancestors.
//! - `load` / `save`: validated YAML round-trip through atomic writes.
//!
//! ## Invariants
//!
//! - `network_id` is in `2..=255`.
//! - `ssl_cert_path` and `ssl_key_path` are both set or both unset, and
//!   `ssl_enabled` is true exactly when they are set.
//!
//! `validate` enforces these on every load and save.
//!
use crate::common::fs::io as fsio;
use crate::core::error::{DockerizerError, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the sidecar configuration document.
pub const CONFIG_FILENAME: &str = ".drupal_dockerizer.yml";

/// How the project's containers are reached from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    /// Web container published on `http://localhost`.
    Localhost,
    /// Dedicated bridge network `192.168.<network_id>.0/24`, reached by domain name.
    Bridge { network_id: u8 },
}

/// Per-project configuration, consumed by the playbooks as extra vars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfiguration {
    pub user_uid: u32,
    pub compose_project_name: String,
    pub docker_runtime_dir: String,
    pub drupal_root_dir: PathBuf,
    pub drupal_web_root: String,
    pub drupal_files_dir: PathBuf,
    pub advanced_networking: bool,
    pub network_id: u8,
    pub domain_name: String,
    /// Key spelling is fixed by the playbooks.
    #[serde(rename = "xdebug_enviroment")]
    pub xdebug_environment: String,
    pub solr: bool,
    pub solr_version: u8,
    /// Written as `''` when unset; the playbooks always expect the key.
    #[serde(default, with = "empty_path")]
    pub solr_configs_path: Option<PathBuf>,
    pub memcache: bool,
    pub install_adminer: bool,
    pub drush_commands: Vec<String>,
    #[serde(deserialize_with = "drush_version_from_any")]
    pub drush_version: u8,
    pub custom_drupal_settings: String,
    pub phpversion: String,
    #[serde(default)]
    pub ssl_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_cert_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_key_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_dump_path: Option<PathBuf>,
}

impl ProjectConfiguration {
    pub fn network_mode(&self) -> NetworkMode {
        if self.advanced_networking {
            NetworkMode::Bridge {
                network_id: self.network_id,
            }
        } else {
            NetworkMode::Localhost
        }
    }

    /// Docker container running PHP and drush for this project.
    pub fn php_container_name(&self) -> String {
        format!("{}-{}", self.compose_project_name, self.phpversion)
    }

    /// Where the site is reachable once the project is up.
    pub fn site_url(&self) -> String {
        match self.network_mode() {
            NetworkMode::Bridge { .. } => {
                let scheme = if self.ssl_enabled { "https" } else { "http" };
                format!("{}://{}", scheme, self.domain_name)
            }
            NetworkMode::Localhost => "http://localhost".to_string(),
        }
    }

    /// Domain recorded in the global registry.
    pub fn registry_domain(&self) -> String {
        match self.network_mode() {
            NetworkMode::Bridge { .. } => self.domain_name.clone(),
            NetworkMode::Localhost => "http://localhost".to_string(),
        }
    }

    /// Location of this project's sidecar file.
    pub fn config_path(&self) -> PathBuf {
        self.drupal_root_dir.join(CONFIG_FILENAME)
    }

    /// Checks the document invariants.
    pub fn validate(&self) -> Result<()> {
        if self.network_id < 2 {
            return Err(invalid(format!(
                "network_id {} is outside 2..=255",
                self.network_id
            )));
        }
        match (&self.ssl_cert_path, &self.ssl_key_path) {
            (Some(_), Some(_)) if !self.ssl_enabled => {
                return Err(invalid(
                    "ssl_enabled is false although certificate and key are set".to_string(),
                ))
            }
            (None, None) if self.ssl_enabled => {
                return Err(invalid(
                    "ssl_enabled is true but no certificate and key are set".to_string(),
                ))
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(invalid(
                    "ssl_cert_path and ssl_key_path must be set together".to_string(),
                ))
            }
            _ => {}
        }
        if self.compose_project_name.is_empty() {
            return Err(invalid("compose_project_name is empty".to_string()));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize project configuration")
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).context("Failed to parse project configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a sidecar file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading project configuration from {}", path.display());
        let content = fsio::read_file_to_string(path)?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Validates and writes the document to `path`, replacing any previous content.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        fsio::write_string_atomic(path, &self.to_yaml()?)?;
        info!("Saved project configuration to {}", path.display());
        Ok(())
    }
}

/// (De)serializes an optional path as a string, with `''` standing for `None`.
mod empty_path {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::path::PathBuf;

    pub fn serialize<S: Serializer>(path: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error> {
        match path {
            Some(p) => serializer.serialize_str(&p.to_string_lossy()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PathBuf>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()).map(PathBuf::from))
    }
}

/// Accepts `drush_version: 9` as well as the quoted `drush_version: '9'`.
fn drush_version_from_any<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u8),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("drush_version '{}' is not a number", s))
        }),
    }
}

fn invalid(msg: String) -> anyhow::Error {
    anyhow!(DockerizerError::InvalidConfig(msg))
}

/// Finds the sidecar file in `start` or the nearest ancestor that has one.
pub fn find_config_path(start: &Path) -> Result<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            debug!("Found project config at {}", candidate.display());
            return Ok(candidate);
        }
    }
    Err(anyhow!(DockerizerError::ConfigNotFound {
        start: start.to_path_buf(),
    }))
}

/// Locates and loads the project configuration for `start`.
///
/// Returns the path the document was found at alongside it.
pub fn load_for_dir(start: &Path) -> Result<(PathBuf, ProjectConfiguration)> {
    let path = find_config_path(start)?;
    let config = ProjectConfiguration::load(&path)?;
    Ok((path, config))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// A fully populated configuration rooted at `root`.
    pub(crate) fn sample_config(root: &Path) -> ProjectConfiguration {
        ProjectConfiguration {
            user_uid: 1000,
            compose_project_name: "shop".to_string(),
            docker_runtime_dir: "shop".to_string(),
            drupal_root_dir: root.to_path_buf(),
            drupal_web_root: "web".to_string(),
            drupal_files_dir: root.join("web/sites/default/files"),
            advanced_networking: true,
            network_id: 3,
            domain_name: "shop.devel".to_string(),
            xdebug_environment: "remote_enable=1 remote_host=192.168.3.1".to_string(),
            solr: true,
            solr_version: 7,
            solr_configs_path: Some(root.join("solr")),
            memcache: true,
            install_adminer: false,
            drush_commands: vec!["cc drush".into(), "cr".into(), "sapi-r".into()],
            drush_version: 9,
            custom_drupal_settings: "if (file_exists($x)) {\n    include $x;\n  }\n  ".to_string(),
            phpversion: "7.4-develop".to_string(),
            ssl_enabled: true,
            ssl_cert_path: Some(root.join("cert.pem")),
            ssl_key_path: Some(root.join("key.pem")),
            db_dump_path: Some(root.join("dump.sql")),
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let config = sample_config(dir.path());
        let path = config.config_path();
        config.save(&path).unwrap();

        let loaded = ProjectConfiguration::load(&path).unwrap();
        assert_eq!(loaded, config);
        // Serializing again produces identical bytes.
        assert_eq!(loaded.to_yaml().unwrap(), fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn test_yaml_uses_playbook_keys() {
        let dir = tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.solr_configs_path = None;
        config.db_dump_path = None;
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("xdebug_enviroment:"));
        assert!(yaml.contains("compose_project_name: shop"));
        assert!(yaml.contains("phpversion: 7.4-develop"));
        assert!(!yaml.contains("db_dump_path"));
        assert!(yaml.contains("solr_configs_path: ''"));

        let reloaded = ProjectConfiguration::from_yaml(&yaml).unwrap();
        assert_eq!(reloaded.solr_configs_path, None);
    }

    #[test]
    fn test_reads_quoted_drush_version() {
        let dir = tempdir().unwrap();
        let yaml = sample_config(dir.path())
            .to_yaml()
            .unwrap()
            .replace("drush_version: 9", "drush_version: '9'");
        assert!(yaml.contains("drush_version: '9'"));
        let config = ProjectConfiguration::from_yaml(&yaml).unwrap();
        assert_eq!(config.drush_version, 9);

        let bad = yaml.replace("drush_version: '9'", "drush_version: nine");
        assert!(ProjectConfiguration::from_yaml(&bad).is_err());
    }

    #[test]
    fn test_network_mode_and_urls() {
        let dir = tempdir().unwrap();
        let mut config = sample_config(dir.path());
        assert_eq!(config.network_mode(), NetworkMode::Bridge { network_id: 3 });
        assert_eq!(config.site_url(), "https://shop.devel");
        assert_eq!(config.registry_domain(), "shop.devel");
        assert_eq!(config.php_container_name(), "shop-7.4-develop");

        config.advanced_networking = false;
        assert_eq!(config.network_mode(), NetworkMode::Localhost);
        assert_eq!(config.site_url(), "http://localhost");
        assert_eq!(config.registry_domain(), "http://localhost");
    }

    #[test]
    fn test_validate_rejects_half_tls() {
        let dir = tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.ssl_key_path = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be set together"));
    }

    #[test]
    fn test_validate_rejects_low_network_id() {
        let dir = tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.network_id = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_inconsistent_file() {
        let dir = tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.ssl_enabled = false;
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();
        let err = ProjectConfiguration::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("ssl_enabled is false"));
    }

    #[test]
    fn test_find_config_in_ancestor() {
        let dir = tempdir().unwrap();
        let config = sample_config(dir.path());
        config.save(&config.config_path()).unwrap();
        let nested = dir.path().join("web/modules/custom");
        fs::create_dir_all(&nested).unwrap();

        let (found, loaded) = load_for_dir(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
        assert_eq!(loaded.compose_project_name, "shop");
    }

    #[test]
    fn test_find_config_missing() {
        let dir = tempdir().unwrap();
        let err = find_config_path(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DockerizerError>(),
            Some(DockerizerError::ConfigNotFound { .. })
        ));
    }
}
