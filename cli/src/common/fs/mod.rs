//! # Drupal Dockerizer Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Entry point for filesystem helpers. Everything lives in the `io`
//! submodule; import from there (`crate::common::fs::io::write_string_atomic`).
//!

/// Directory creation, file reads, and atomic file writes.
pub mod io;
