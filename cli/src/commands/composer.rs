//! # Drupal Dockerizer Composer Handler
//!
//! File: cli/src/commands/composer.rs
//!
//! Implements `drupal-dockerizer composer[:tag] <args...>`. Composer runs in
//! an ephemeral official `composer` container with the current directory
//! mounted at `/app`, as the invoking user so created files keep the right
//! owner. No project configuration is needed.
//!
//! ```bash
//! drupal-dockerizer composer require drupal/admin_toolbar
//! drupal-dockerizer composer:1 install
//! ```
//!
use crate::commands::Context;
use crate::common::docker::{self, DEFAULT_COMPOSER_TAG};
use crate::core::error::Result;
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ComposerArgs {
    /// Tag of the composer image.
    #[arg(long, default_value = DEFAULT_COMPOSER_TAG)]
    pub tag: String,

    /// Arguments passed to composer.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub fn handle_composer(args: ComposerArgs, ctx: &mut Context) -> Result<()> {
    info!("Handling composer command (composer:{})...", args.tag);
    ctx.runner.run(&docker::composer_run(
        &ctx.cwd,
        ctx.ids,
        &args.tag,
        &args.args,
        ctx.tty,
    ))
}
