//! # Drupal Dockerizer Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Every external program this tool drives (`ansible-pull`, `docker exec`,
//! `docker run composer`) is described by an `Invocation`: the program, its
//! argument vector, an optional working directory and environment overrides.
//! Arguments are passed to the OS as a vector, never through a shell, so paths
//! and drush arguments containing spaces or quotes reach the program intact.
//!
//! ## Architecture
//!
//! - `Invocation`: builder-style descriptor with a printable preview.
//! - `ProcessRunner`: trait executing an `Invocation`.
//! - `SystemRunner`: spawns the program with inherited stdio and waits for it.
//! - `DryRunRunner`: prints the preview and reports success (global `--dry-run`).
//!
use crate::core::error::{DockerizerError, Result};
use anyhow::Context;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// A fully specified external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// The arguments as lossy UTF-8 strings, for assertions and previews.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for Invocation {
    /// Shell-like preview: `KEY=value program arg ...`, quoting arguments with whitespace.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program)?;
        for arg in self.args_lossy() {
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                write!(f, " '{}'", arg.replace('\'', "'\\''"))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Executes invocations.
pub trait ProcessRunner {
    /// Runs `invocation` to completion. A non-zero exit is an `ExternalCommand` error.
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs programs for real, inheriting the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        info!("Running: {}", invocation);
        let status = invocation
            .to_command()
            .status()
            .with_context(|| format!("Failed to start '{}'", invocation.program))?;
        debug!("'{}' exited with {}", invocation.program, status);
        if !status.success() {
            anyhow::bail!(DockerizerError::ExternalCommand {
                cmd: invocation.to_string(),
                status: status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "terminated by signal".to_string()),
            });
        }
        Ok(())
    }
}

/// Prints invocations instead of running them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl ProcessRunner for DryRunRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        match &invocation.cwd {
            Some(dir) => println!("[dry-run] (in {}) {}", dir.display(), invocation),
            None => println!("[dry-run] {}", invocation),
        }
        Ok(())
    }
}
