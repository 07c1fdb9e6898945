//! # Drupal Dockerizer Stop Handler
//!
//! File: cli/src/commands/stop.rs
//!
//! Implements `drupal-dockerizer stop`: runs `stop.yml` and marks the project
//! as stopped in the registry. A project that was never registered is still
//! stopped; the registry is left untouched and a warning is logged.
//!
use crate::commands::Context;
use crate::common::ansible::{self, Playbook};
use crate::core::error::{is_error, DockerizerError, Result};
use tracing::{info, warn};

pub fn handle_stop(ctx: &mut Context) -> Result<()> {
    info!("Handling stop command...");
    let (config_path, config) = ctx.load_project()?;
    ctx.runner
        .run(&ansible::pull(&ctx.settings, &config_path, Playbook::Stop))?;

    match ctx.update_registry(|registry| registry.stop_instance(&config)) {
        Ok(()) => {}
        Err(e) if is_error(&e, |de| matches!(de, DockerizerError::UnknownInstance { .. })) => {
            warn!(
                "Project '{}' is not registered; registry left unchanged.",
                config.compose_project_name
            );
        }
        Err(e) => return Err(e),
    }
    println!("Project {} stopped", config.compose_project_name);
    Ok(())
}
