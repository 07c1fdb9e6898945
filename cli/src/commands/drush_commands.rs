//! # Drupal Dockerizer Drush Commands Handler
//!
//! File: cli/src/commands/drush_commands.rs
//!
//! Implements `drupal-dockerizer drush-commands`: runs the `drush_commands`
//! list from the project configuration through `run-drush-commands.yml`.
//!
use crate::commands::Context;
use crate::common::ansible::{self, Playbook};
use crate::core::error::Result;
use tracing::info;

pub fn handle_drush_commands(ctx: &mut Context) -> Result<()> {
    info!("Handling drush-commands command...");
    let (config_path, config) = ctx.load_project()?;
    ctx.runner.run(&ansible::pull(
        &ctx.settings,
        &config_path,
        Playbook::RunDrushCommands,
    ))?;
    println!(
        "Executed drush commands for {}: {}",
        config.compose_project_name,
        config.drush_commands.join(", ")
    );
    Ok(())
}
