//! # Drupal Dockerizer Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file is the main entry point for the `drupal-dockerizer` CLI.
//! It handles:
//! - Command-line argument parsing using Clap (after rewriting `composer:<tag>`)
//! - Setting up the logging system based on verbosity flags
//! - Loading settings and the app registry, and the one-time required-tool check
//! - Routing execution to the command handlers and mapping errors to exit codes
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! drupal-dockerizer --help
//!
//! # Show what `up` would run, without running it
//! drupal-dockerizer --dry-run up
//!
//! # Use another config directory, with debug logging
//! drupal-dockerizer -vv --config-dir /tmp/dd projects
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Resolve the config directory, load settings, open the registry
//! 4. Verify required tools (once per machine)
//! 5. Route to the command handler
//! 6. Report any error and exit non-zero (127 for a missing tool)
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;
mod core;

use crate::common::network::probe::TcpProbe;
use crate::common::process::{DryRunRunner, ProcessRunner, SystemRunner};
use crate::common::system::host::{OsKind, UserIds};
use crate::core::config;
use crate::core::error::{exit_code_for, Result};
use crate::core::registry::AppRegistry;
use anyhow::Context as _;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "drupal-dockerizer",
    about = "Docker development environments for Drupal projects",
    long_about = "Generate a per-project configuration, provision Docker containers through \
                  ansible-pull playbooks, and run drush and composer inside them.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Print external commands instead of running them; the registry is not modified.
    #[arg(long, global = true)]
    dry_run: bool,
    /// Directory holding config.yml and settings.toml.
    #[arg(long, global = true, env = "DRUPAL_DOCKERIZER_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse_from(commands::normalize_args(std::env::args_os()));

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli) {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_dir = config::resolve_config_dir(cli.config_dir.as_deref())?;
    let settings = config::load_settings(&config_dir)?;
    let mut registry = AppRegistry::open(&config_dir)?;

    if cli.dry_run {
        tracing::info!("Dry run: skipping the required-tool check.");
    } else {
        commands::ensure_required_tools(&settings, &mut registry)?;
    }

    let runner: Box<dyn ProcessRunner> = if cli.dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(SystemRunner)
    };
    let probe = TcpProbe::new(settings.probe_timeout());
    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;

    let mut ctx = commands::Context {
        invocation_dir: cwd.clone(),
        cwd,
        settings,
        registry,
        runner,
        probe: Box::new(probe),
        os: OsKind::current(),
        ids: UserIds::current(),
        dry_run: cli.dry_run,
        tty: common::docker::stdin_is_tty(),
    };
    commands::dispatch(cli.command, &mut ctx)
}
