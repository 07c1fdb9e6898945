//! # Drupal Dockerizer Up Handler
//!
//! File: cli/src/commands/up.rs
//!
//! ## Overview
//!
//! Implements `drupal-dockerizer up`. The first run for a project (or any run
//! with `--force`) provisions everything through `main.yml`, which needs sudo
//! for `/etc/hosts`, and registers the project. Later runs only start the
//! existing containers through `up.yml`.
//!
//! ## Usage
//!
//! ```bash
//! drupal-dockerizer up
//! drupal-dockerizer up --force   # re-provision after editing .drupal_dockerizer.yml
//! ```
//!
use crate::commands::Context;
use crate::common::ansible::{self, Playbook};
use crate::core::error::Result;
use crate::core::project::ProjectConfiguration;
use clap::Args;
use std::path::Path;
use tracing::{debug, info};

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpArgs {
    /// Re-run full provisioning even if the project is registered.
    #[arg(long)]
    pub force: bool,
}

pub fn handle_up(args: UpArgs, ctx: &mut Context) -> Result<()> {
    info!("Handling up command...");
    let (config_path, config) = ctx.load_project()?;
    bring_up(&config_path, &config, args.force, ctx)?;
    println!("Project is up. Site up in {}", config.site_url());
    Ok(())
}

/// Provisions or starts the project and records it as up.
pub(crate) fn bring_up(
    config_path: &Path,
    config: &ProjectConfiguration,
    force: bool,
    ctx: &mut Context,
) -> Result<()> {
    let registered = ctx.registry.get(&config.compose_project_name).is_some();
    if registered && !force {
        debug!("'{}' is registered, starting containers", config.compose_project_name);
        ctx.runner
            .run(&ansible::pull(&ctx.settings, config_path, Playbook::Up))?;
        ctx.update_registry(|registry| registry.up_instance(config))
    } else {
        debug!("Provisioning '{}'", config.compose_project_name);
        ctx.runner
            .run(&ansible::pull(&ctx.settings, config_path, Playbook::Main))?;
        ctx.update_registry(|registry| registry.add_instance(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_context;
    use crate::common::process::testing::RecordingRunner;
    use crate::core::project::tests::sample_config;
    use crate::core::registry::InstanceStatus;
    use std::rc::Rc;

    fn playbooks(runner: &RecordingRunner) -> Vec<String> {
        runner
            .calls
            .borrow()
            .iter()
            .map(|inv| inv.args_lossy()[4].clone())
            .collect()
    }

    #[test]
    fn test_first_up_provisions_and_registers() {
        let dir = tempfile::tempdir().unwrap();
        let config = sample_config(dir.path());
        config.save(&config.config_path()).unwrap();
        let runner = Rc::new(RecordingRunner::default());
        let mut ctx = test_context(dir.path(), &dir, runner.clone());

        handle_up(UpArgs::default(), &mut ctx).unwrap();
        assert_eq!(playbooks(&runner), vec!["main.yml"]);
        let entry = ctx.registry.get("shop").unwrap();
        assert_eq!(entry.status, InstanceStatus::Up);
    }

    #[test]
    fn test_registered_project_only_starts() {
        let dir = tempfile::tempdir().unwrap();
        let config = sample_config(dir.path());
        config.save(&config.config_path()).unwrap();
        let runner = Rc::new(RecordingRunner::default());
        let mut ctx = test_context(dir.path(), &dir, runner.clone());
        ctx.registry.add_instance(&config).unwrap();
        ctx.registry.stop_instance(&config).unwrap();

        handle_up(UpArgs::default(), &mut ctx).unwrap();
        handle_up(UpArgs { force: true }, &mut ctx).unwrap();
        assert_eq!(playbooks(&runner), vec!["up.yml", "main.yml"]);
        assert_eq!(ctx.registry.get("shop").unwrap().status, InstanceStatus::Up);
        assert_eq!(ctx.registry.instances().len(), 1);
    }

    #[test]
    fn test_failed_playbook_leaves_registry_alone() {
        let dir = tempfile::tempdir().unwrap();
        let config = sample_config(dir.path());
        config.save(&config.config_path()).unwrap();
        let runner = Rc::new(RecordingRunner::failing("ansible-pull"));
        let mut ctx = test_context(dir.path(), &dir, runner);

        assert!(handle_up(UpArgs::default(), &mut ctx).is_err());
        assert!(ctx.registry.get("shop").is_none());
    }

    #[test]
    fn test_up_without_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path(), &dir, Rc::new(RecordingRunner::default()));
        assert!(handle_up(UpArgs::default(), &mut ctx).is_err());
    }
}
