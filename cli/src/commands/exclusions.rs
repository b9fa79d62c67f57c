//! Exclude / include command implementation
//!
//! Edits the `exclusions` list of a config file in place. Identifiers are
//! validated before anything is written, and `PACKETLOG_*` overrides are
//! never copied into the file.

use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use packetlog_agent::AgentConfig;
use packetlog_shared::types::filter::ExclusionSet;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExclusionArgs {
    /// Config file to edit (created if missing)
    #[arg(short, long, env = "PACKETLOG_CONFIG", default_value = "packetlog.toml")]
    pub config: PathBuf,

    /// Identifiers or catalog labels, e.g. 0x00A, 0x028:0x1844, "Keep-alive"
    #[arg(required = true)]
    pub identifiers: Vec<String>,
}

pub fn run(args: ExclusionArgs, exclude: bool) -> Result<()> {
    let requested = ExclusionSet::parse_all(&args.identifiers)?;
    let (changed, exclusions) = AgentConfig::edit_exclusions(&args.config, &requested, exclude)
        .with_context(|| format!("Failed to update {}", args.config.display()))?;

    if changed == 0 {
        output::info("No changes");
        return Ok(());
    }

    output::success(&format!(
        "{} {} rule(s); excluded now: {}",
        if exclude { "Excluded" } else { "Included" },
        changed,
        exclusions.summary()
    ));
    Ok(())
}
