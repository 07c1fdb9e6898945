//! # Drupal Dockerizer Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! The documents this tool owns and the rules around them:
//!
//! - `builder`: turns `init` flags and host facts into a project configuration.
//! - `config`: optional tool-wide settings (`settings.toml`).
//! - `error`: the error taxonomy and exit-code mapping.
//! - `project`: the per-project sidecar document (`.drupal_dockerizer.yml`).
//! - `registry`: the per-user registry of known projects (`config.yml`).
//!
pub mod builder;
pub mod config;
pub mod error;
pub mod project;
pub mod registry;
