//! # Drupal Dockerizer Init Handler
//!
//! File: cli/src/commands/init.rs
//!
//! ## Overview
//!
//! Implements `drupal-dockerizer init`. Run from a Drupal web root (the
//! directory holding `index.php`), it builds the project configuration from
//! the flags and host facts and writes two files next to the web root's
//! parent:
//!
//! - `<root>/.drupal_dockerizer.yml`, the extra vars for every playbook run;
//! - `<root>/.vscode/launch.json`, an Xdebug debugger configuration.
//!
//! ## Usage
//!
//! ```bash
//! cd my-site/web
//! drupal-dockerizer init --solr=7 --memcache --php=7.3-develop
//! drupal-dockerizer init --network --ssl-cert=certs/site.crt --ssl-key=certs/site.key
//! ```
//!
use crate::commands::Context;
use crate::core::builder::{self, InitOptions, ProjectConfigBuilder};
use crate::core::error::Result;
use crate::core::project::ProjectConfiguration;
use clap::Args;
use tracing::{debug, info};

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InitArgs {
    #[command(flatten)]
    pub options: InitOptions,
}

pub fn handle_init(args: InitArgs, ctx: &mut Context) -> Result<()> {
    info!("Handling init command...");
    debug!("Init args: {:?}", args);
    let config = init_project(&args.options, ctx)?;
    println!("Config generated with vars:");
    print!("{}", config.to_yaml()?);
    Ok(())
}

/// Builds and writes the configuration for the web root `ctx.cwd`.
pub(crate) fn init_project(options: &InitOptions, ctx: &Context) -> Result<ProjectConfiguration> {
    let config = ProjectConfigBuilder::new(&ctx.settings, ctx.probe.as_ref())
        .build(options, &ctx.host_facts())?;
    builder::write_project_files(&config)?;
    info!("Wrote {}", config.config_path().display());
    Ok(config)
}
