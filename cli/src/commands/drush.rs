//! # Drupal Dockerizer Drush Handler
//!
//! File: cli/src/commands/drush.rs
//!
//! Implements `drupal-dockerizer drush <args...>`, which runs drush inside the
//! project's PHP container. Arguments are passed through unchanged, so quoted
//! arguments with spaces stay a single argument.
//!
//! ```bash
//! drupal-dockerizer drush cr
//! drupal-dockerizer drush sql-query "SELECT name FROM users_field_data"
//! ```
//!
use crate::commands::Context;
use crate::common::docker;
use crate::core::error::Result;
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DrushArgs {
    /// Arguments passed to drush.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub fn handle_drush(args: DrushArgs, ctx: &mut Context) -> Result<()> {
    info!("Handling drush command...");
    let (_, config) = ctx.load_project()?;
    ctx.runner
        .run(&docker::drush_exec(&config, &args.args, ctx.tty))
}
