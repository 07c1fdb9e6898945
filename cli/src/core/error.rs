//! # Drupal Dockerizer Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout drupal-dockerizer.
//! Handlers return `anyhow::Result`, so every failure can carry context, while
//! the conditions callers need to recognise are variants of `DockerizerError`
//! and can be recovered with `downcast_ref`.
//!
//! ## Architecture
//!
//! - `DockerizerError`: a `thiserror` enum with one variant per failure class.
//! - `Result<T>`: alias for `anyhow::Result<T>`.
//! - `exit_code_for`: maps an error chain to the process exit status.
//!
//! ## Examples
//!
//! ```text
//! // Return a specific error
//! if !marker.is_file() {
//!     bail!(DockerizerError::NotADrupalRoot { dir: cwd.to_path_buf() });
//! }
//!
//! // Check for a specific condition further up
//! if is_error(&err, |e| matches!(e, DockerizerError::UnknownInstance { .. })) { ... }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for drupal-dockerizer.
#[derive(Error, Debug)]
pub enum DockerizerError {
    #[error(
        "'{}' is not a Drupal web root: index.php not found. Run this command from the directory that contains index.php.",
        dir.display()
    )]
    NotADrupalRoot { dir: PathBuf },

    #[error(
        "Config already exists at '{}'. Run `drupal-dockerizer up` or remove the config and run init again.",
        path.display()
    )]
    ConfigAlreadyExists { path: PathBuf },

    #[error(
        "Can't find config in '{}' or any parent directory. Please run `drupal-dockerizer init` first.",
        start.display()
    )]
    ConfigNotFound { start: PathBuf },

    #[error("Port {port} is not free. Please stop the application using it or choose another port.")]
    PortUnavailable { port: u16 },

    #[error("drupal-dockerizer requires program '{tool}', which was not found in PATH.")]
    MissingRequiredTool { tool: String },

    #[error("Project '{name}' is not registered. Run `drupal-dockerizer up` for it first.")]
    UnknownInstance { name: String },

    #[error("Invalid database dump: {0}")]
    InvalidDbDumpPath(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("External command failed: {cmd}, Status: {status}")]
    ExternalCommand { cmd: String, status: String },
}

/// Type alias for Result using anyhow::Error for context-rich propagation.
pub type Result<T> = anyhow::Result<T>;

/// Returns true when `err` wraps a `DockerizerError` matching `pred`.
pub fn is_error(err: &anyhow::Error, pred: impl Fn(&DockerizerError) -> bool) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<DockerizerError>())
        .any(pred)
}

/// Maps an error to the exit status reported by `main`.
///
/// A missing required tool mirrors the shell's "command not found" (127);
/// every other failure exits with 1.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if is_error(err, |e| matches!(e, DockerizerError::MissingRequiredTool { .. })) {
        127
    } else {
        1
    }
}
