//! mirra: command-line front end for progress scoring and capture checks.
//!
//! Every subcommand reads JSON from disk and prints JSON to stdout. Logs go
//! to stderr so the output can be piped.

mod config;
mod snapshot;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Args, Parser, Subcommand};
use mirra_core::clock::{Clock, ManualClock, SystemClock};
use mirra_core::types::AppState;
use mirra_guard::{
    assess_capture, detect_suspicious_patterns, Capture, RateLimitResult, TrustLevel, UploadLedger,
};
use mirra_metrics::{capture_confidence, MetricGenerator};
use mirra_scoring::ScoringEngine;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::MirraConfig;
use crate::snapshot::{read_json, write_json};

#[derive(Parser, Debug)]
#[command(name = "mirra", version, about = "Progress scoring and capture checks for Mirra")]
struct Cli {
    /// Config file (default: <config_dir>/mirra/mirra.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the progress score of an app-state snapshot.
    Score(StateArgs),
    /// Show unlock status, optionally stamping the unlock time.
    Unlock(UnlockArgs),
    /// Generate a metric snapshot from a capture seed.
    Metrics(MetricsArgs),
    /// Run the quality, filter, angle and cadence checks on a capture.
    Trust(FileArgs),
    /// Report suspicious cadence in a list of upload timestamps.
    Patterns(FileArgs),
    /// Check whether another upload would be accepted after a history.
    RateLimit(RateLimitArgs),
}

#[derive(Args, Debug)]
struct StateArgs {
    /// App-state JSON file.
    state: PathBuf,

    /// Evaluate at this RFC 3339 instant instead of now.
    #[arg(long)]
    now: Option<DateTime<FixedOffset>>,
}

#[derive(Args, Debug)]
struct UnlockArgs {
    #[command(flatten)]
    state: StateArgs,

    /// Write the unlock time back to the state file when the gate opens.
    #[arg(long)]
    stamp: bool,
}

#[derive(Args, Debug)]
struct MetricsArgs {
    /// Capture seed in [0, 1).
    #[arg(long)]
    seed: f64,

    /// Seed the variance draws too, so output is identical across runs.
    #[arg(long)]
    reproducible: bool,
}

#[derive(Args, Debug)]
struct FileArgs {
    /// Input JSON file.
    input: PathBuf,
}

#[derive(Args, Debug)]
struct RateLimitArgs {
    /// JSON array of RFC 3339 upload timestamps.
    input: PathBuf,

    /// Check at this RFC 3339 instant instead of now.
    #[arg(long)]
    now: Option<DateTime<FixedOffset>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    let cfg = MirraConfig::load(cli.config.as_deref())?;
    debug!(?cfg, "effective configuration");

    match cli.command {
        Commands::Score(args) => score(&cfg, &args),
        Commands::Unlock(args) => unlock(&cfg, &args),
        Commands::Metrics(args) => metrics(&args),
        Commands::Trust(args) => trust(&cfg, &args.input),
        Commands::Patterns(args) => patterns(&args.input),
        Commands::RateLimit(args) => rate_limit(&cfg, &args),
    }
}

fn resolve_now(now: Option<DateTime<FixedOffset>>) -> DateTime<FixedOffset> {
    now.unwrap_or_else(|| SystemClock.now())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn score(cfg: &MirraConfig, args: &StateArgs) -> Result<()> {
    let engine = ScoringEngine::new(cfg.scoring)?;
    let state: AppState = read_json(&args.state)?;
    let now = resolve_now(args.now).with_timezone(&Utc);

    print_json(&engine.calculate_progress_score(&state, now))
}

fn unlock(cfg: &MirraConfig, args: &UnlockArgs) -> Result<()> {
    let engine = ScoringEngine::new(cfg.scoring)?;
    let path = &args.state.state;
    let mut state: AppState = read_json(path)?;
    let now = resolve_now(args.state.now).with_timezone(&Utc);

    if args.stamp && engine.refresh_unlock(&mut state, now) {
        write_json(path, &state)
            .with_context(|| format!("failed to stamp unlock in {}", path.display()))?;
        info!(path = %path.display(), "unlock stamped");
    }

    print_json(&engine.check_unlock_status(&state, now))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsOutput {
    seed: f64,
    confidence: f64,
    metrics: Vec<mirra_core::types::MetricSample>,
}

fn metrics(args: &MetricsArgs) -> Result<()> {
    let generator = MetricGenerator::builtin()?;
    let samples = if args.reproducible {
        generator.generate_reproducible(args.seed)?
    } else {
        generator.generate(args.seed)?
    };

    print_json(&MetricsOutput {
        seed: args.seed,
        confidence: capture_confidence(&samples),
        metrics: samples,
    })
}

fn trust(cfg: &MirraConfig, input: &Path) -> Result<()> {
    let capture: Capture = read_json(input)?;
    let assessment = assess_capture(&capture, &cfg.guard.validation);
    if assessment.trust.level == TrustLevel::Low {
        warn!(score = assessment.trust.score, message = %assessment.trust.message, "low trust capture");
    }
    print_json(&assessment)
}

fn patterns(input: &Path) -> Result<()> {
    let timestamps: Vec<DateTime<FixedOffset>> = read_json(input)?;
    print_json(&detect_suspicious_patterns(&timestamps))
}

fn rate_limit(cfg: &MirraConfig, args: &RateLimitArgs) -> Result<()> {
    print_json(&replay_rate_limit(cfg, args)?)
}

/// Replay the upload history through a manual clock, then check at `now`.
fn replay_rate_limit(cfg: &MirraConfig, args: &RateLimitArgs) -> Result<RateLimitResult> {
    let mut history: Vec<DateTime<FixedOffset>> = read_json(&args.input)?;
    history.sort_unstable();
    let now = resolve_now(args.now);

    let clock = Arc::new(ManualClock::new(now));
    let mut ledger = UploadLedger::with_config(cfg.guard.rate_limit, Arc::clone(&clock));
    for at in history.into_iter().filter(|t| *t <= now) {
        clock.set(at);
        ledger.record_upload();
    }
    clock.set(now);

    Ok(ledger.check_rate_limit())
}

fn init_logging(level: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
