//! # Drupal Dockerizer Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command handlers, separate from the
//! domain documents in `core::`.
//!
//! ## Architecture
//!
//! - **`ansible`**: `ansible-pull` invocations for each playbook.
//! - **`docker`**: `docker exec` (drush) and `docker run` (composer) invocations.
//! - **`fs`**: directory creation, reads, atomic writes.
//! - **`network`**: reachability probing and free network/port detection.
//! - **`process`**: the `Invocation` descriptor and `ProcessRunner` implementations.
//! - **`system`**: host facts (OS, user ids) and required-tool checks.
//!
//! ## Usage
//!
//! ```text
//! use crate::common::{ansible, process::ProcessRunner};
//!
//! let invocation = ansible::pull(&settings, &config_path, ansible::Playbook::Up);
//! runner.run(&invocation)?;
//! ```
//!

/// Playbook invocations through `ansible-pull`.
pub mod ansible;
/// Direct `docker` invocations (drush, composer).
pub mod docker;
/// Filesystem helpers.
pub mod fs;
/// Network probing.
pub mod network;
/// External process descriptors and runners.
pub mod process;
/// Host facts and tool checks.
pub mod system;
