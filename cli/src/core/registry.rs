//! # Drupal Dockerizer Global App Registry
//!
//! File: cli/src/core/registry.rs
//!
//! ## Overview
//!
//! One YAML document per user (`<config dir>/config.yml`) records every
//! project that has been brought up on this machine, together with whether
//! the required-tool check already passed.
//!
//! ```yaml
//! instances:
//!   shop:
//!     domain: shop.devel
//!     instance: shop
//!     root_dir: /home/me/sites/shop
//!     status: up
//! is_check_requirements_tools: true
//! version: 0.1.0
//! ```
//!
//! ## Architecture
//!
//! `AppRegistry` is constructed once per invocation and passed to the command
//! handlers. The document is created lazily with defaults on first access.
//!
//! Every mutation runs as a transaction:
//! 1. take an exclusive lock on `config.lock` next to the document (`fs2`),
//! 2. reload the document from disk,
//! 3. apply the change,
//! 4. write the document atomically (temp file + rename),
//! 5. release the lock.
//!
//! Two invocations racing on the registry therefore serialize, and neither
//! overwrites the other's change with a stale copy.
//!
use crate::common::fs::io as fsio;
use crate::core::error::{DockerizerError, Result};
use crate::core::project::ProjectConfiguration;
use anyhow::{anyhow, Context};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const REGISTRY_FILENAME: &str = "config.yml";
const LOCK_FILENAME: &str = "config.lock";

/// Lifecycle state of a registered project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Up,
    Stop,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceStatus::Up => write!(f, "up"),
            InstanceStatus::Stop => write!(f, "stop"),
        }
    }
}

/// A project known to this machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRegistryEntry {
    pub instance: String,
    pub root_dir: PathBuf,
    pub domain: String,
    pub status: InstanceStatus,
}

/// The persisted registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub instances: BTreeMap<String, AppRegistryEntry>,
    #[serde(default)]
    pub is_check_requirements_tools: bool,
    #[serde(default = "current_version")]
    pub version: String,
}

impl Default for RegistryDocument {
    fn default() -> Self {
        Self {
            instances: BTreeMap::new(),
            is_check_requirements_tools: false,
            version: current_version(),
        }
    }
}

fn current_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// The per-user registry of projects.
#[derive(Debug)]
pub struct AppRegistry {
    path: PathBuf,
    lock_path: PathBuf,
    data: RegistryDocument,
}

impl AppRegistry {
    /// Opens the registry in `config_dir`, creating the directory and a default document if needed.
    ///
    /// # Arguments
    ///
    /// * `config_dir` - The directory holding `config.yml` and its lock file
    ///
    /// # Returns
    ///
    /// * `Result<AppRegistry>` - The registry with the document loaded from disk
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - The directory cannot be created
    /// - The lock cannot be taken
    /// - An existing `config.yml` cannot be read or parsed
    pub fn open(config_dir: &Path) -> Result<Self> {
        fsio::ensure_dir_exists(config_dir)?;
        let mut registry = Self {
            path: config_dir.join(REGISTRY_FILENAME),
            lock_path: config_dir.join(LOCK_FILENAME),
            data: RegistryDocument::default(),
        };
        // Hold the lock so a concurrent first run doesn't write the default twice.
        let _guard = registry.lock()?;
        if registry.path.exists() {
            registry.data = registry.read_from_disk()?;
        } else {
            info!("Creating app registry at {}", registry.path.display());
            registry.write_to_disk()?;
        }
        Ok(registry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &RegistryDocument {
        &self.data
    }

    pub fn instances(&self) -> &BTreeMap<String, AppRegistryEntry> {
        &self.data.instances
    }

    pub fn get(&self, name: &str) -> Option<&AppRegistryEntry> {
        self.data.instances.get(name)
    }

    pub fn requirements_checked(&self) -> bool {
        self.data.is_check_requirements_tools
    }

    /// Records that the required-tool check passed.
    pub fn mark_requirements_checked(&mut self) -> Result<()> {
        self.transact(|doc| {
            doc.is_check_requirements_tools = true;
            Ok(())
        })
    }

    /// Registers (or re-registers) the project with status `up`.
    ///
    /// The entry is keyed by the compose project name, so registering the
    /// same project twice replaces the earlier entry.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the registry cannot be locked, read or written.
    pub fn add_instance(&mut self, config: &ProjectConfiguration) -> Result<()> {
        let entry = AppRegistryEntry {
            instance: config.compose_project_name.clone(),
            root_dir: config.drupal_root_dir.clone(),
            domain: config.registry_domain(),
            status: InstanceStatus::Up,
        };
        self.transact(|doc| {
            doc.instances.insert(entry.instance.clone(), entry);
            Ok(())
        })
    }

    /// Marks a registered project as stopped.
    pub fn stop_instance(&mut self, config: &ProjectConfiguration) -> Result<()> {
        self.set_status(&config.compose_project_name, InstanceStatus::Stop)
    }

    /// Marks a registered project as up.
    pub fn up_instance(&mut self, config: &ProjectConfiguration) -> Result<()> {
        self.set_status(&config.compose_project_name, InstanceStatus::Up)
    }

    /// Removes a registered project.
    ///
    /// # Arguments
    ///
    /// * `config` - The project whose compose project name is removed
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - The project was never added (`UnknownInstance`); the file is left as it was
    /// - The registry cannot be locked, read or written
    pub fn remove_instance(&mut self, config: &ProjectConfiguration) -> Result<()> {
        let name = config.compose_project_name.clone();
        self.transact(|doc| match doc.instances.remove(&name) {
            Some(_) => Ok(()),
            None => Err(anyhow!(DockerizerError::UnknownInstance { name })),
        })
    }

    fn set_status(&mut self, name: &str, status: InstanceStatus) -> Result<()> {
        self.transact(|doc| match doc.instances.get_mut(name) {
            Some(entry) => {
                entry.status = status;
                Ok(())
            }
            None => Err(anyhow!(DockerizerError::UnknownInstance {
                name: name.to_string(),
            })),
        })
    }

    /// Lock, reload, mutate, write, unlock. A failing `change` leaves the file untouched.
    ///
    /// # Arguments
    ///
    /// * `change` - Applied to a fresh copy of the document read under the lock
    ///
    /// # Returns
    ///
    /// * `Result<T>` - Whatever `change` returned, once the document is on disk
    fn transact<T>(
        &mut self,
        change: impl FnOnce(&mut RegistryDocument) -> Result<T>,
    ) -> Result<T> {
        let _guard = self.lock()?;
        // Re-read: another process may have written since we opened.
        let mut doc = self.read_from_disk()?;
        let value = change(&mut doc)?;
        self.data = doc;
        self.write_to_disk()?;
        Ok(value)
    }

    fn lock(&self) -> Result<RegistryLock> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .with_context(|| format!("Failed to open lock file {}", self.lock_path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("Failed to lock {}", self.lock_path.display()))?;
        debug!("Locked {}", self.lock_path.display());
        Ok(RegistryLock { file })
    }

    fn read_from_disk(&self) -> Result<RegistryDocument> {
        if !self.path.exists() {
            return Ok(RegistryDocument::default());
        }
        let content = fsio::read_file_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RegistryDocument::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse app registry {}", self.path.display()))
    }

    fn write_to_disk(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&self.data).context("Failed to serialize app registry")?;
        fsio::write_string_atomic(&self.path, &yaml)
    }
}

/// Holds the exclusive registry lock until dropped.
struct RegistryLock {
    file: File,
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
