//! evac-check - evacuation time compliance check
//!
//! Reads an evacuation request (JSON), runs the Annex 8a calculation and
//! prints the trace and verdict.
//!
//! ```text
//! evac-check --request demos/request.json
//! evac-check --request demos/request.json --regulations regulations.json --json
//! ```
//!
//! Exit status: 0 for PASS or UNKNOWN, 2 for FAIL, 1 for errors.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use evacuation_core_rs::compliance::{self, EvacuationRequest, Verdict};
use evacuation_core_rs::RegulationsLoader;

/// Evacuation time check (Ordinance Iz-1971, Annex 8a)
#[derive(Parser)]
#[command(name = "evac-check")]
#[command(about = "Evacuation time compliance check", long_about = None)]
#[command(version)]
struct Cli {
    /// Request file (JSON)
    #[arg(short, long)]
    request: PathBuf,

    /// Regulatory data file; the bundled data is used when omitted
    #[arg(long, env = "EVAC_REGULATIONS")]
    regulations: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, env = "EVAC_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(Verdict::Fail) => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Verdict> {
    let reg = match &cli.regulations {
        Some(path) => RegulationsLoader::from_path(path)
            .with_context(|| format!("loading regulations from {}", path.display()))?,
        None => RegulationsLoader::bundled(),
    };
    let reg = Arc::new(reg);

    let text = std::fs::read_to_string(&cli.request)
        .with_context(|| format!("reading request {}", cli.request.display()))?;
    let request = EvacuationRequest::from_json_str(&text)
        .with_context(|| format!("parsing request {}", cli.request.display()))?;
    tracing::debug!(
        request = %cli.request.display(),
        segments = request.segments.len(),
        occupant_count = request.occupant_count,
        "request loaded"
    );

    let report = compliance::evaluate(&reg, &request)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.log);
        println!();
        println!("{}", report.summary());
        println!("regulations: {}", report.regulations_fingerprint);
    }

    Ok(report.verdict)
}
