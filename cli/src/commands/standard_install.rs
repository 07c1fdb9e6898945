//! # Drupal Dockerizer Standard Install Handler
//!
//! File: cli/src/commands/standard_install.rs
//!
//! ## Overview
//!
//! Implements `drupal-dockerizer standard-install` (also accepted under its
//! old name `drupal-standart-install`). From an empty directory it:
//!
//! 1. creates `drupal-project` from `drupal/recommended-project` with composer;
//! 2. adds `drush/drush` to it;
//! 3. runs `init` in `drupal-project/web` with the given init flags;
//! 4. brings the project up (full provisioning);
//! 5. installs Drupal with the standard profile (`admin` / `admin`);
//! 6. runs the configured drush commands.
//!
//! Any failing step stops the sequence.
//!
use crate::commands::init::init_project;
use crate::commands::up::bring_up;
use crate::commands::Context;
use crate::common::ansible::{self, Playbook};
use crate::common::docker::{self, DEFAULT_COMPOSER_TAG};
use crate::core::builder::{InitOptions, DRUPAL_MARKER_FILE};
use crate::core::error::Result;
use clap::Args;
use tracing::{info, warn};

const PROJECT_DIR: &str = "drupal-project";
const WEB_DIR: &str = "web";
const ADMIN_PASSWORD: &str = "admin";

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardInstallArgs {
    #[command(flatten)]
    pub options: InitOptions,
}

pub fn handle_standard_install(args: StandardInstallArgs, ctx: &mut Context) -> Result<()> {
    info!("Handling standard-install command...");
    let project_dir = ctx.cwd.join(PROJECT_DIR);

    println!("Creating {} from drupal/recommended-project...", project_dir.display());
    ctx.runner.run(&docker::composer_run(
        &ctx.cwd,
        ctx.ids,
        DEFAULT_COMPOSER_TAG,
        &composer_args(&["create-project", "drupal/recommended-project", PROJECT_DIR]),
        ctx.tty,
    ))?;
    ctx.runner.run(&docker::composer_run(
        &project_dir,
        ctx.ids,
        DEFAULT_COMPOSER_TAG,
        &composer_args(&["require", "drush/drush"]),
        ctx.tty,
    ))?;

    let web_root = project_dir.join(WEB_DIR);
    if ctx.dry_run && !web_root.join(DRUPAL_MARKER_FILE).is_file() {
        warn!("{} was not created in dry-run mode; skipping the remaining steps.", web_root.display());
        println!("[dry-run] init, up, site install and drush commands follow in {}", web_root.display());
        return Ok(());
    }

    ctx.cwd = web_root;
    let config = init_project(&args.options, ctx)?;
    let config_path = config.config_path();
    bring_up(&config_path, &config, false, ctx)?;

    ctx.runner.run(&docker::drush_exec(
        &config,
        &[
            "si".to_string(),
            format!("--account-pass={}", ADMIN_PASSWORD),
            "--site-name=Drupal".to_string(),
            "-y".to_string(),
        ],
        ctx.tty,
    ))?;
    ctx.runner.run(&ansible::pull(
        &ctx.settings,
        &config_path,
        Playbook::RunDrushCommands,
    ))?;

    println!("Drupal installed. Site up in {}", config.site_url());
    println!("Login: admin / {}", ADMIN_PASSWORD);
    Ok(())
}

fn composer_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
