//! # Drupal Dockerizer System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Facts about the host machine and checks against it:
//!
//! - **`host`**: OS family and the numeric user/group ids containers should
//!   run as, so files written inside the containers stay owned by the user.
//! - **`tools`**: verifies required external programs (`ansible`, `docker`,
//!   `docker-compose`, `git`) are on `PATH`.
//!

/// OS family and user ids of the invoking user.
pub mod host;
/// Required external tool detection.
pub mod tools;
