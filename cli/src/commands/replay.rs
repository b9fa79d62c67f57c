//! Replay command implementation

use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use packetlog_agent::{
    feed, metrics, session_from_config, AgentConfig, SessionSummary, StartOutcome,
};
use packetlog_shared::utils::format_elapsed;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Capture file to replay
    pub capture: PathBuf,

    /// Config file (TOML); missing files fall back to defaults
    #[arg(short, long, env = "PACKETLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra exclusion, e.g. 0x00A or 0x028:0x1844 (repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Override the log directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Print the session summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Print session metrics in Prometheus text format after the summary
    #[arg(long)]
    pub metrics: bool,
}

pub async fn run(args: ReplayArgs) -> Result<()> {
    let mut config = AgentConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.log_dir {
        config.log_dir = dir;
    }
    config.exclusions.extend(args.exclude);
    config.validate().context("Invalid configuration")?;
    debug!("Replay configuration: {:?}", config);

    let file = File::open(&args.capture)
        .with_context(|| format!("Failed to open capture: {}", args.capture.display()))?;

    let session = Arc::new(session_from_config(&config)?);
    match session.start().context("Failed to start logging session")? {
        StartOutcome::Started { location } => output::info(&format!("Logging to {}", location)),
        StartOutcome::AlreadyActive { location } => {
            output::warning(&format!("Session already active: {}", location))
        }
    }

    let (tx, rx) = feed::channel(config.feed_capacity);
    let reader = feed::spawn_capture_reader(BufReader::new(file), tx);
    let mut pump = tokio::spawn(feed::pump(session.clone(), rx));

    let delivered = tokio::select! {
        res = &mut pump => Some(res.context("Feed task failed")?),
        _ = tokio::signal::ctrl_c() => None,
    };

    // stop records trailer and close failures, so read the status after it
    let summary = session.stop();
    let status = session.status();

    let Some(delivered) = delivered else {
        pump.abort();
        output::warning("Interrupted; session closed");
        if let Some(summary) = &summary {
            print_summary(summary, None, args.json)?;
        }
        report_sink_error(status.last_error.as_deref());
        print_metrics(args.metrics);
        return Ok(());
    };

    let read_result = reader.await.context("Capture reader failed")?;
    if let Some(summary) = &summary {
        print_summary(summary, Some(delivered), args.json)?;
    }
    report_sink_error(status.last_error.as_deref());
    print_metrics(args.metrics);

    read_result.map(|_| ())
}

fn report_sink_error(last_error: Option<&str>) {
    if let Some(err) = last_error {
        output::warning(&format!("Session log is incomplete: {}", err));
    }
}

fn print_metrics(enabled: bool) {
    if enabled {
        print!("{}", metrics::encode_metrics());
    }
}

fn print_summary(summary: &SessionSummary, delivered: Option<u64>, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "location": summary.location,
            "messages_logged": summary.count,
            "messages_delivered": delivered,
            "started_at": summary.started_at.to_rfc3339(),
            "ended_at": summary.ended_at.to_rfc3339(),
            "elapsed_secs": summary.elapsed.as_secs_f64(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    output::success(&format!(
        "Logged {} of {} messages in {} to {}",
        summary.count,
        delivered
            .map(|d| d.to_string())
            .unwrap_or_else(|| "?".to_string()),
        format_elapsed(summary.elapsed),
        summary.location
    ));
    Ok(())
}
