//! Dump command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// File to render
    pub path: PathBuf,

    /// Render at most this many bytes
    #[arg(short, long)]
    pub limit: Option<usize>,
}

pub fn run(args: DumpArgs) -> Result<()> {
    let bytes = std::fs::read(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let len = args.limit.map_or(bytes.len(), |l| l.min(bytes.len()));

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(packetlog_agent::render(&bytes[..len]).as_bytes())?;
    stdout.flush()?;
    Ok(())
}
