//! # Drupal Dockerizer Database Import Handler
//!
//! File: cli/src/commands/import_db.rs
//!
//! ## Overview
//!
//! Implements `drupal-dockerizer import-db [path]`. A given dump path must
//! name an existing file ending in `sql`; its absolute path is stored as
//! `db_dump_path` in the project configuration before `db.yml` runs, so later
//! imports can omit it.
//!
//! ## Usage
//!
//! ```bash
//! drupal-dockerizer import-db ../dumps/prod.sql
//! drupal-dockerizer import-db                 # re-import the stored dump
//! ```
//!
use crate::commands::Context;
use crate::common::ansible::{self, Playbook};
use crate::core::builder::absolutize;
use crate::core::error::{DockerizerError, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDbArgs {
    /// Path to the .sql dump; defaults to the one stored in the config.
    pub path: Option<PathBuf>,
}

pub fn handle_import_db(args: ImportDbArgs, ctx: &mut Context) -> Result<()> {
    info!("Handling import-db command...");
    let (config_path, mut config) = ctx.load_project()?;

    match args.path {
        Some(path) => {
            let dump = validate_dump_path(&path, &ctx.invocation_dir)?;
            config.db_dump_path = Some(dump);
            if ctx.dry_run {
                println!("[dry-run] {} not updated", config_path.display());
            } else {
                config.save(&config_path)?;
            }
        }
        None => match &config.db_dump_path {
            Some(stored) => println!("Using database dump from config: {}", stored.display()),
            None => anyhow::bail!(DockerizerError::InvalidDbDumpPath(
                "no dump path given and none stored in the project config".to_string()
            )),
        },
    }

    ctx.runner
        .run(&ansible::pull(&ctx.settings, &config_path, Playbook::Db))?;
    println!("Database imported for {}", config.compose_project_name);
    Ok(())
}

/// Resolves `path` against `base` and checks it is an existing `*sql` file.
fn validate_dump_path(path: &Path, base: &Path) -> Result<PathBuf> {
    let dump = absolutize(path, base);
    debug!("Validating database dump {}", dump.display());
    let name_ok = dump
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("sql"));
    if !name_ok {
        anyhow::bail!(DockerizerError::InvalidDbDumpPath(format!(
            "{} does not end with 'sql'",
            dump.display()
        )));
    }
    if !dump.is_file() {
        anyhow::bail!(DockerizerError::InvalidDbDumpPath(format!(
            "{} does not exist",
            dump.display()
        )));
    }
    Ok(dump)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_context;
    use crate::common::process::testing::RecordingRunner;
    use crate::core::error::is_error;
    use crate::core::project::tests::sample_config;
    use crate::core::project::ProjectConfiguration;
    use std::rc::Rc;

    fn invalid_dump(err: &anyhow::Error) -> bool {
        is_error(err, |e| matches!(e, DockerizerError::InvalidDbDumpPath(_)))
    }

    #[test]
    fn test_import_stores_absolute_dump_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.db_dump_path = None;
        config.save(&config.config_path()).unwrap();
        std::fs::create_dir_all(dir.path().join("dumps")).unwrap();
        std::fs::write(dir.path().join("dumps/prod.sql"), "-- dump").unwrap();
        let runner = Rc::new(RecordingRunner::default());
        let mut ctx = test_context(dir.path(), &dir, runner.clone());

        let args = ImportDbArgs {
            path: Some(PathBuf::from("dumps/prod.sql")),
        };
        handle_import_db(args, &mut ctx).unwrap();

        let saved = ProjectConfiguration::load(&config.config_path()).unwrap();
        assert_eq!(saved.db_dump_path, Some(dir.path().join("dumps/prod.sql")));
        assert_eq!(runner.calls.borrow()[0].args_lossy()[4], "db.yml");
    }

    #[test]
    fn test_import_rejects_bad_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config = sample_config(dir.path());
        config.save(&config.config_path()).unwrap();
        std::fs::write(dir.path().join("dump.tar.gz"), "x").unwrap();
        let runner = Rc::new(RecordingRunner::default());
        let mut ctx = test_context(dir.path(), &dir, runner.clone());

        let wrong_ext = ImportDbArgs {
            path: Some(PathBuf::from("dump.tar.gz")),
        };
        assert!(invalid_dump(&handle_import_db(wrong_ext, &mut ctx).unwrap_err()));
        let missing = ImportDbArgs {
            path: Some(PathBuf::from("missing.sql")),
        };
        assert!(invalid_dump(&handle_import_db(missing, &mut ctx).unwrap_err()));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_import_reuses_stored_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = sample_config(dir.path());
        config.save(&config.config_path()).unwrap();
        let runner = Rc::new(RecordingRunner::default());
        let mut ctx = test_context(dir.path(), &dir, runner.clone());

        handle_import_db(ImportDbArgs::default(), &mut ctx).unwrap();
        assert_eq!(runner.programs(), vec!["ansible-pull"]);
    }

    #[test]
    fn test_import_without_any_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sample_config(dir.path());
        config.db_dump_path = None;
        config.save(&config.config_path()).unwrap();
        let mut ctx = test_context(dir.path(), &dir, Rc::new(RecordingRunner::default()));

        let err = handle_import_db(ImportDbArgs::default(), &mut ctx).unwrap_err();
        assert!(invalid_dump(&err));
    }
}
