//! Catalog command implementation

use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use packetlog_agent::AgentConfig;
use packetlog_shared::registry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Config file whose exclusions are shown as checked
    #[arg(short, long, env = "PACKETLOG_CONFIG")]
    pub config: Option<PathBuf>,
}

pub fn run(args: CatalogArgs) -> Result<()> {
    let config = AgentConfig::load(args.config.as_deref())?;
    let exclusions = config.exclusion_set().context("Invalid exclusion list")?;

    println!("  {:<3} {:<16} LABEL", "", "IDENTIFIER");
    for entry in registry::entries() {
        println!(
            "  {} {:<16} {}",
            output::checkbox(exclusions.contains(&entry.rule)),
            entry.rule.to_string(),
            entry.label
        );
    }

    // Excluded rules that are not in the catalog still apply; list them too.
    let extra: Vec<_> = exclusions
        .iter()
        .filter(|rule| registry::lookup(rule).is_none())
        .collect();
    if !extra.is_empty() {
        println!();
        for rule in extra {
            println!("  {} {:<16} (not in catalog)", output::checkbox(true), rule.to_string());
        }
    }

    Ok(())
}
