//! # Drupal Dockerizer Down Handler
//!
//! File: cli/src/commands/down.rs
//!
//! Implements `drupal-dockerizer down`: runs `reset.yml` (with sudo, it
//! removes root-owned runtime data such as databases and logs) and removes
//! the project from the registry.
//!
//! The project files and `.drupal_dockerizer.yml` are kept, so a later `up`
//! provisions the project from scratch.
//!
use crate::commands::Context;
use crate::common::ansible::{self, Playbook};
use crate::core::error::Result;
use anyhow::Context as _;
use tracing::info;

pub fn handle_down(ctx: &mut Context) -> Result<()> {
    info!("Handling down command...");
    let (config_path, config) = ctx.load_project()?;
    ctx.runner
        .run(&ansible::pull(&ctx.settings, &config_path, Playbook::Reset))?;
    ctx.update_registry(|registry| registry.remove_instance(&config))
        .with_context(|| {
            format!(
                "Containers removed, but '{}' could not be removed from the registry",
                config.compose_project_name
            )
        })?;
    println!("Project {} removed", config.compose_project_name);
    Ok(())
}
