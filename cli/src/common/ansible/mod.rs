//! # Drupal Dockerizer Playbook Invocations (`common::ansible`)
//!
//! File: cli/src/common/ansible/mod.rs
//!
//! ## Overview
//!
//! Provisioning is done by playbooks that `ansible-pull` checks out from the
//! playbook repository and runs locally, with the project's sidecar file as
//! extra vars:
//!
//! ```bash
//! ANSIBLE_FORCE_COLOR=true ansible-pull --extra-vars @/path/.drupal_dockerizer.yml \
//!     -U https://github.com/jet-dev-team/drupal-dockerizer.git main.yml -C pre-release --ask-become-pass
//! ```
//!
//! Playbooks that touch `/etc/hosts` or remove root-owned runtime files need
//! sudo, so they ask for the become password.
//!
use crate::common::process::Invocation;
use crate::core::config::Settings;
use std::fmt;
use std::path::Path;

/// Playbooks shipped in the playbook repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playbook {
    /// Full provisioning: images, containers, hosts entries.
    Main,
    /// Start already provisioned containers.
    Up,
    /// Stop containers.
    Stop,
    /// Remove containers and runtime data.
    Reset,
    /// Import the database dump.
    Db,
    /// Run the configured drush commands.
    RunDrushCommands,
}

impl Playbook {
    pub fn file_name(self) -> &'static str {
        match self {
            Playbook::Main => "main.yml",
            Playbook::Up => "up.yml",
            Playbook::Stop => "stop.yml",
            Playbook::Reset => "reset.yml",
            Playbook::Db => "db.yml",
            Playbook::RunDrushCommands => "run-drush-commands.yml",
        }
    }

    pub fn needs_become(self) -> bool {
        matches!(self, Playbook::Main | Playbook::Reset)
    }
}

impl fmt::Display for Playbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Builds the `ansible-pull` invocation running `playbook` for the sidecar at `config_path`.
///
/// # Arguments
///
/// * `settings` - Supplies the playbook repository and ref
/// * `config_path` - The sidecar, handed to the playbook as `--extra-vars @<path>`
/// * `playbook` - Which playbook to run
///
/// # Returns
///
/// * `Invocation` - The command, not yet run; `main.yml` and `reset.yml`
///   add `--ask-become-pass`
pub fn pull(settings: &Settings, config_path: &Path, playbook: Playbook) -> Invocation {
    // ansible reads a variables file when the value starts with `@`.
    let mut extra_vars = std::ffi::OsString::from("@");
    extra_vars.push(config_path.as_os_str());

    let invocation = Invocation::new("ansible-pull")
        .env("ANSIBLE_FORCE_COLOR", "true")
        .arg("--extra-vars")
        .arg(extra_vars)
        .arg("-U")
        .arg(&settings.playbook_repo)
        .arg(playbook.file_name())
        .arg("-C")
        .arg(&settings.playbook_ref);
    if playbook.needs_become() {
        invocation.arg("--ask-become-pass")
    } else {
        invocation
    }
}
