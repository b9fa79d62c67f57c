//! CLI for packetlog
//!
//! Commands:
//! - replay: stream a capture file through a logging session
//! - catalog: list known message types and their exclusion state
//! - dump: hex-dump an arbitrary file
//! - exclude / include: edit the exclusion list of a config file

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "packetlog")]
#[command(about = "packetlog - filtered hex-dump logging of protocol messages", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a capture file into a new session log
    Replay(commands::replay::ReplayArgs),

    /// List catalog message types and whether they are excluded
    Catalog(commands::catalog::CatalogArgs),

    /// Print a file as a hex dump
    Dump(commands::dump::DumpArgs),

    /// Add identifiers to a config file's exclusion list
    Exclude(commands::exclusions::ExclusionArgs),

    /// Remove identifiers from a config file's exclusion list
    Include(commands::exclusions::ExclusionArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Replay(args) => commands::replay::run(args).await,
        Commands::Catalog(args) => commands::catalog::run(args),
        Commands::Dump(args) => commands::dump::run(args),
        Commands::Exclude(args) => commands::exclusions::run(args, true),
        Commands::Include(args) => commands::exclusions::run(args, false),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
