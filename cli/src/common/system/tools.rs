//! # Required Tool Checks
//!
//! File: cli/src/common/system/tools.rs
//!
//! Every provisioning step shells out to Ansible or Docker, so a missing
//! program is fatal. The check runs once per machine: on success the global
//! registry records `is_check_requirements_tools: true` and later invocations
//! skip it.
//!
use crate::core::error::{DockerizerError, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Returns the path of every tool, or `MissingRequiredTool` for the first one absent from PATH.
pub fn check_required_tools(tools: &[String]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::with_capacity(tools.len());
    for tool in tools {
        match which::which(tool) {
            Ok(path) => {
                debug!("Found required tool '{}' at {}", tool, path.display());
                found.push(path);
            }
            Err(e) => {
                debug!("Required tool '{}' not found: {}", tool, e);
                anyhow::bail!(DockerizerError::MissingRequiredTool { tool: tool.clone() });
            }
        }
    }
    info!("All required tools found: {}", tools.join(", "));
    Ok(found)
}
