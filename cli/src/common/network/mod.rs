//! # Drupal Dockerizer Network Utilities Module (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//!
//! ## Overview
//!
//! Network discovery used while generating a project configuration:
//!
//! - **`probe`**: TCP-connect reachability checks, free private network
//!   index selection for bridge networking, and the localhost port check for
//!   localhost networking.
//!
//! ## Usage
//!
//! ```text
//! use crate::common::network::probe::{self, TcpProbe};
//!
//! let probe = TcpProbe::new(settings.probe_timeout());
//! let network_id = probe::select_free_network_index(&probe, settings.probe_port);
//! probe::ensure_local_port_free(&probe, settings.http_port)?;
//! ```
//!

/// Reachability probing and free network/port detection.
pub mod probe;
