//! # Drupal Dockerizer Project Handler
//!
//! File: cli/src/commands/project_cmd.rs
//!
//! ## Overview
//!
//! Implements `drupal-dockerizer project <name> [command...]`.
//!
//! Without a command it prints the registry entry of `<name>`. With one, the
//! command is parsed like a top-level invocation and run from the project's
//! root directory, so projects can be managed from anywhere. Relative path
//! arguments (e.g. a dump for `import-db`) still resolve against the
//! directory the user ran the command from.
//!
//! ## Usage
//!
//! ```bash
//! drupal-dockerizer project shop
//! drupal-dockerizer project shop stop
//! drupal-dockerizer project shop drush uli
//! ```
//!
use crate::commands::{dispatch, normalize_command, Context, ProjectCommandLine};
use crate::core::error::{DockerizerError, Result};
use anyhow::{anyhow, Context as _};
use clap::{Args, Parser};
use tracing::{debug, info};

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectArgs {
    /// Registered project name.
    pub name: String,

    /// Command to run for the project.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub fn handle_project(args: ProjectArgs, ctx: &mut Context) -> Result<()> {
    info!("Handling project command for '{}'...", args.name);
    let entry = ctx
        .registry
        .get(&args.name)
        .cloned()
        .ok_or_else(|| anyhow!(DockerizerError::UnknownInstance { name: args.name.clone() }))?;

    if args.command.is_empty() {
        println!("Project {}", entry.instance);
        println!("  status: {}", entry.status);
        println!("  domain: {}", entry.domain);
        println!("  root:   {}", entry.root_dir.display());
        return Ok(());
    }

    let parsed = ProjectCommandLine::try_parse_from(normalize_command(&args.command))
        .with_context(|| format!("Invalid command for project '{}'", args.name))?;
    debug!("Running {:?} in {}", parsed.command, entry.root_dir.display());
    ctx.cwd = entry.root_dir;
    dispatch(parsed.command, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_context;
    use crate::common::process::testing::RecordingRunner;
    use crate::core::error::is_error;
    use crate::core::project::tests::sample_config;
    use crate::core::project::ProjectConfiguration;
    use crate::core::registry::InstanceStatus;
    use std::rc::Rc;

    #[test]
    fn test_project_runs_command_in_project_root() {
        let project_dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let config = sample_config(project_dir.path());
        config.save(&config.config_path()).unwrap();
        let runner = Rc::new(RecordingRunner::default());
        let mut ctx = test_context(elsewhere.path(), &elsewhere, runner.clone());
        ctx.registry.add_instance(&config).unwrap();

        let args = ProjectArgs {
            name: "shop".to_string(),
            command: vec!["stop".to_string()],
        };
        handle_project(args, &mut ctx).unwrap();
        assert_eq!(runner.calls.borrow()[0].args_lossy()[4], "stop.yml");
        assert_eq!(ctx.registry.get("shop").unwrap().status, InstanceStatus::Stop);
    }

    #[test]
    fn test_project_import_db_resolves_dump_from_invocation_dir() {
        let project_dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let mut config = sample_config(project_dir.path());
        config.db_dump_path = None;
        config.save(&config.config_path()).unwrap();
        std::fs::write(elsewhere.path().join("dump.sql"), "-- dump").unwrap();
        let runner = Rc::new(RecordingRunner::default());
        let mut ctx = test_context(elsewhere.path(), &elsewhere, runner.clone());
        ctx.registry.add_instance(&config).unwrap();

        let args = ProjectArgs {
            name: "shop".to_string(),
            command: vec!["import-db".to_string(), "dump.sql".to_string()],
        };
        handle_project(args, &mut ctx).unwrap();

        let saved = ProjectConfiguration::load(&config.config_path()).unwrap();
        assert_eq!(saved.db_dump_path, Some(elsewhere.path().join("dump.sql")));
        assert_eq!(runner.calls.borrow()[0].args_lossy()[4], "db.yml");
    }

    #[test]
    fn test_project_passes_drush_arguments() {
        let project_dir = tempfile::tempdir().unwrap();
        let config = sample_config(project_dir.path());
        config.save(&config.config_path()).unwrap();
        let runner = Rc::new(RecordingRunner::default());
        let mut ctx = test_context(project_dir.path(), &project_dir, runner.clone());
        ctx.registry.add_instance(&config).unwrap();

        let args = ProjectArgs {
            name: "shop".to_string(),
            command: vec!["drush".into(), "uli".into(), "--name=admin".into()],
        };
        handle_project(args, &mut ctx).unwrap();
        let call = &runner.calls.borrow()[0];
        assert_eq!(call.args_lossy()[3..], ["drush", "uli", "--name=admin"]);
    }

    #[test]
    fn test_unknown_project() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path(), &dir, Rc::new(RecordingRunner::default()));
        let err = handle_project(
            ProjectArgs {
                name: "ghost".to_string(),
                command: Vec::new(),
            },
            &mut ctx,
        )
        .unwrap_err();
        assert!(is_error(&err, |e| matches!(e, DockerizerError::UnknownInstance { .. })));
    }

    #[test]
    fn test_invalid_nested_command() {
        let dir = tempfile::tempdir().unwrap();
        let config = sample_config(dir.path());
        let mut ctx = test_context(dir.path(), &dir, Rc::new(RecordingRunner::default()));
        ctx.registry.add_instance(&config).unwrap();
        let args = ProjectArgs {
            name: "shop".to_string(),
            command: vec!["launch".to_string()],
        };
        assert!(handle_project(args, &mut ctx).is_err());
    }
}
