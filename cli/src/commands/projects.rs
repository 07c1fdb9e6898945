//! # Drupal Dockerizer Projects Handler
//!
//! File: cli/src/commands/projects.rs
//!
//! Implements `drupal-dockerizer projects`, listing every registered project
//! with its status and domain, in name order.
//!
use crate::commands::Context;
use crate::core::error::Result;
use crate::core::registry::AppRegistryEntry;
use tracing::{debug, info};

pub fn handle_projects(ctx: &mut Context) -> Result<()> {
    info!("Handling projects command...");
    debug!(
        "Registry {} (version {})",
        ctx.registry.path().display(),
        ctx.registry.document().version
    );
    let entries: Vec<&AppRegistryEntry> = ctx.registry.instances().values().collect();
    print!("{}", render_projects(&entries));
    Ok(())
}

fn render_projects(entries: &[&AppRegistryEntry]) -> String {
    if entries.is_empty() {
        return "No projects registered.\n".to_string();
    }
    let mut out = String::from("Status projects:\n");
    for entry in entries {
        out.push_str(&format!(
            "{} is {}, domain {}\n",
            entry.instance, entry.status, entry.domain
        ));
    }
    out
}
