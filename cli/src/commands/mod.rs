//! # Drupal Dockerizer Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module defines every verb of the CLI and routes parsed commands to
//! their handlers. It also owns the `Context` handed to each handler: the
//! working directory, settings, the app registry, and the process runner.
//!
//! ## Command Groups
//!
//! - Project setup: `init`, `standard-install`
//! - Lifecycle: `up`, `stop`, `down`
//! - Inside the containers: `drush`, `drush-commands`, `import-db`, `composer`
//! - Registry: `projects`, `project`
//!
//! ## Argument normalisation
//!
//! Before clap sees the arguments, `normalize_args` rewrites them:
//!
//! - `composer:2 install` becomes `composer --tag 2 -- install`;
//! - `drush -v` becomes `drush -- -v`.
//!
//! Everything after `drush` or `composer [--tag <tag>]` belongs to drush or
//! composer, including `-v`, `--help` and `--version`.
//!
use crate::common::network::probe::Probe;
use crate::common::process::ProcessRunner;
use crate::common::system::host::{OsKind, UserIds};
use crate::common::system::tools;
use crate::core::builder::HostFacts;
use crate::core::config::Settings;
use crate::core::error::Result;
use crate::core::project::{self, ProjectConfiguration};
use crate::core::registry::AppRegistry;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, info};

/// Implements `composer[:version]` (runs Composer in a throwaway container).
pub mod composer;
/// Implements `down` (removes containers and runtime data).
pub mod down;
/// Implements `drush` (runs drush in the PHP container).
pub mod drush;
/// Implements `drush-commands` (runs the configured drush commands).
pub mod drush_commands;
/// Implements `import-db` (imports a database dump).
pub mod import_db;
/// Implements `init` (generates the project configuration).
pub mod init;
/// Implements `project` (inspects or runs a command for a registered project).
pub mod project_cmd;
/// Implements `projects` (lists registered projects).
pub mod projects;
/// Implements `standard-install` (creates, provisions and installs a fresh Drupal site).
pub mod standard_install;
/// Implements `stop` (stops containers).
pub mod stop;
/// Implements `up` (provisions or starts containers).
pub mod up;

/// All verbs of the CLI.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Initialize the config for the Drupal project in the current web root.
    Init(init::InitArgs),
    /// Bring the docker environment up (asks for the sudo password on first run).
    Up(up::UpArgs),
    /// Stop the containers.
    Stop,
    /// Remove all containers and runtime data (databases, search indexes, logs).
    Down,
    /// Execute a drush command in the PHP container.
    Drush(drush::DrushArgs),
    /// Import the database from an .sql dump.
    #[command(name = "import-db")]
    ImportDb(import_db::ImportDbArgs),
    /// Execute the drush commands from the config in the container.
    #[command(name = "drush-commands")]
    DrushCommands,
    /// Run a composer command in the official composer container (`composer:<tag>` also works).
    Composer(composer::ComposerArgs),
    /// List registered projects.
    Projects,
    /// Show a registered project, or run a command for it.
    Project(project_cmd::ProjectArgs),
    /// Create a fresh drupal/recommended-project, bring it up and install it.
    #[command(name = "standard-install", alias = "drupal-standart-install")]
    StandardInstall(standard_install::StandardInstallArgs),
}

/// Parser for a command line passed to `project <name> ...`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct ProjectCommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

/// Everything a command handler needs about the current invocation.
pub struct Context {
    /// Directory the command operates in (a project root for `project <name> ...`).
    pub cwd: PathBuf,
    /// Directory the user ran the binary from; relative path arguments resolve against it.
    pub invocation_dir: PathBuf,
    pub settings: Settings,
    pub registry: AppRegistry,
    pub runner: Box<dyn ProcessRunner>,
    pub probe: Box<dyn Probe>,
    pub os: OsKind,
    pub ids: UserIds,
    pub dry_run: bool,
    pub tty: bool,
}

impl Context {
    /// Finds and loads the project configuration for the working directory.
    pub fn load_project(&self) -> Result<(PathBuf, ProjectConfiguration)> {
        project::load_for_dir(&self.cwd)
    }

    pub fn host_facts(&self) -> HostFacts {
        HostFacts {
            cwd: self.cwd.clone(),
            os: self.os,
            uid: self.ids.uid,
        }
    }

    /// Applies `change` to the registry, unless this is a dry run.
    pub fn update_registry(
        &mut self,
        change: impl FnOnce(&mut AppRegistry) -> Result<()>,
    ) -> Result<()> {
        if self.dry_run {
            println!("[dry-run] registry {} not updated", self.registry.path().display());
            return Ok(());
        }
        change(&mut self.registry)
    }
}

/// Routes `command` to its handler.
pub fn dispatch(command: Commands, ctx: &mut Context) -> Result<()> {
    debug!("Dispatching {:?} in {}", command, ctx.cwd.display());
    match command {
        Commands::Init(args) => init::handle_init(args, ctx),
        Commands::Up(args) => up::handle_up(args, ctx),
        Commands::Stop => stop::handle_stop(ctx),
        Commands::Down => down::handle_down(ctx),
        Commands::Drush(args) => drush::handle_drush(args, ctx),
        Commands::ImportDb(args) => import_db::handle_import_db(args, ctx),
        Commands::DrushCommands => drush_commands::handle_drush_commands(ctx),
        Commands::Composer(args) => composer::handle_composer(args, ctx),
        Commands::Projects => projects::handle_projects(ctx),
        Commands::Project(args) => project_cmd::handle_project(args, ctx),
        Commands::StandardInstall(args) => standard_install::handle_standard_install(args, ctx),
    }
}

/// Global flags that take a separate value (`--config-dir DIR`).
const GLOBAL_FLAGS_WITH_VALUE: [&str; 1] = ["--config-dir"];

/// Normalizes a full argv (binary name first). See the module docs.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut out: Vec<OsString> = args.next().into_iter().collect();
    out.extend(normalize_command(args));
    out
}

/// Normalizes a command line without the binary name, as given to `project <name> ...`.
///
/// `composer:<tag>` becomes `composer --tag <tag>`, and a `--` is placed
/// after `drush` and `composer` (and their `--tag`) so flags such as `-v`
/// or `--version` reach the tool instead of this CLI. Other verbs are
/// returned untouched.
///
/// # Arguments
///
/// * `args` - The tokens following the binary name
///
/// # Returns
///
/// * `Vec<OsString>` - The tokens ready for clap
pub fn normalize_command<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut out = Vec::with_capacity(args.len() + 3);
    let mut rest = args.into_iter().peekable();

    // Global flags before the verb pass through unchanged.
    while let Some(arg) = rest.next_if(|a| a.to_str().is_some_and(|s| s.starts_with('-'))) {
        let takes_value = arg
            .to_str()
            .is_some_and(|s| GLOBAL_FLAGS_WITH_VALUE.contains(&s));
        out.push(arg);
        if takes_value {
            out.extend(rest.next());
        }
    }

    let Some(verb) = rest.next() else {
        return out;
    };
    let verb_name = verb.to_str().map(str::to_owned);
    match verb_name.as_deref() {
        Some("drush") => out.push(verb),
        Some("composer") => {
            out.push(verb);
            // `--tag <tag>` or `--tag=<tag>` directly after the verb is ours.
            let next = rest.peek().and_then(|a| a.to_str()).map(str::to_owned);
            match next.as_deref() {
                Some("--tag") => {
                    out.extend(rest.next());
                    out.extend(rest.next());
                }
                Some(flag) if flag.starts_with("--tag=") => out.extend(rest.next()),
                _ => {}
            }
        }
        Some(name) if name.starts_with("composer:") => {
            out.push(OsString::from("composer"));
            out.push(OsString::from("--tag"));
            out.push(OsString::from(&name["composer:".len()..]));
        }
        _ => {
            out.push(verb);
            out.extend(rest);
            return out;
        }
    }

    if rest.peek().and_then(|a| a.to_str()) != Some("--") {
        out.push(OsString::from("--"));
    }
    out.extend(rest);
    out
}

/// Verifies the required tools once per machine and records the result.
pub fn ensure_required_tools(settings: &Settings, registry: &mut AppRegistry) -> Result<()> {
    if registry.requirements_checked() {
        debug!("Required tools already verified.");
        return Ok(());
    }
    tools::check_required_tools(&settings.required_tools)?;
    registry.mark_requirements_checked()?;
    info!("Required tools verified and recorded.");
    Ok(())
}
