mod host;
mod replay;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use churnguard_activity::{EvictionPolicy, KeepForever, RetentionHorizon};
use churnguard_config::{
    apply_all_defaults, config_dir, config_file_path, load_and_prepare, load_with_report, write_config,
    ChurnGuardConfig,
};
use churnguard_core::{ChannelEvent, NetworkClassifier};
use churnguard_logging::{init_logger, DecisionLogger};
use churnguard_policy::{spawn_sweeper, AnnotationStyle, EventPolicy, FilterPipeline};

use host::SimulatedHost;
use replay::{read_events, replay, ReplayClock};

#[derive(Parser)]
#[command(name = "churnguard")]
#[command(about = "churnguard: hides join/part/quit noise from users who are not talking")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.churnguard/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an NDJSON event log and print one verdict per event
    Replay {
        file: PathBuf,
        /// Judge events by the current time instead of their recorded time
        #[arg(long)]
        wall_clock: bool,
        /// Only print events that would be shown
        #[arg(long)]
        only_visible: bool,
    },
    /// Replay a log, then report how many records a sweep would evict
    SweepPreview { file: PathBuf },
    /// Filter live events read as NDJSON from stdin
    Filter,
    /// Validate the config and print the effective values
    CheckConfig,
    /// Write a config file populated with defaults
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(|| config_file_path(&config_dir()));

    match cli.command {
        Commands::CheckConfig => check_config(&config_path, &mut std::io::stdout()).await,
        Commands::InitConfig { force } => init_config(&config_path, force).await,
        Commands::Replay { file, wall_clock, only_visible } => {
            let app = App::start(&config_path).await?;
            let clock = if wall_clock { ReplayClock::WallClock } else { ReplayClock::EventTime };
            run_replay(&app, &file, clock, only_visible).await
        }
        Commands::SweepPreview { file } => {
            let app = App::start(&config_path).await?;
            run_sweep_preview(&app, &file).await
        }
        Commands::Filter => {
            let app = App::start(&config_path).await?;
            run_filter(&app).await
        }
    }
}

/// Everything the event-handling commands share once the config is loaded.
struct App {
    config: ChurnGuardConfig,
    pipeline: FilterPipeline,
    logger: DecisionLogger,
}

impl App {
    async fn start(config_path: &Path) -> Result<Self> {
        let config = load_and_prepare(config_path).await?;
        init_logger(config.log_dir(), &config.log_level());
        info!(config = %config_path.display(), "churnguard starting");
        Ok(Self::from_config(config))
    }

    fn from_config(config: ChurnGuardConfig) -> Self {
        let pipeline = build_pipeline(&config);
        let logger = DecisionLogger::new(config.redact_hostmasks());
        Self { config, pipeline, logger }
    }
}

fn build_pipeline(config: &ChurnGuardConfig) -> FilterPipeline {
    let policy = EventPolicy::new(
        NetworkClassifier::new(config.unreliable_networks()),
        AnnotationStyle { colour_code: config.colour_code() },
    );
    let eviction: Arc<dyn EvictionPolicy> = if config.retention_enabled() {
        Arc::new(RetentionHorizon::from_secs(config.retention_horizon_secs()))
    } else {
        Arc::new(KeepForever)
    };
    FilterPipeline::new(policy, eviction)
}

async fn run_replay(app: &App, file: &Path, clock: ReplayClock, only_visible: bool) -> Result<()> {
    let events = read_events(file)
        .await
        .with_context(|| format!("Failed to load event log: {}", file.display()))?;
    let mut write_err = None;
    let summary = replay(&app.pipeline, &events, clock, &app.logger, |outcome| {
        if only_visible && outcome.verdict.is_suppressed() {
            return;
        }
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                write_err.get_or_insert(e);
            }
        }
    })
    .await;
    if let Some(e) = write_err {
        return Err(e.into());
    }

    info!(
        events = summary.events,
        suppressed = summary.suppressed,
        passed = summary.passed,
        rewritten = summary.rewritten,
        tracked = app.pipeline.tracked().await,
        "Replay complete"
    );
    Ok(())
}

async fn run_sweep_preview(app: &App, file: &Path) -> Result<()> {
    let events = read_events(file)
        .await
        .with_context(|| format!("Failed to load event log: {}", file.display()))?;
    let summary = replay(&app.pipeline, &events, ReplayClock::EventTime, &app.logger, |_| {}).await;
    let at = summary.last_at.unwrap_or_else(Utc::now);
    let report = serde_json::json!({
        "at": at,
        "tracked": app.pipeline.tracked().await,
        "evictable": app.pipeline.evictable_at(at).await,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Read `ChannelEvent` lines from stdin until EOF with the sweeper running
/// alongside.
async fn run_filter(app: &App) -> Result<()> {
    let every = Duration::from_secs(app.config.sweep_interval_secs());
    let (sweeper, stop) = spawn_sweeper(app.pipeline.clone(), every);

    let stdin = BufReader::new(tokio::io::stdin());
    let result = filter_stream(&app.pipeline, &app.logger, stdin, &mut std::io::stdout()).await;

    let _ = stop.send(true);
    sweeper.await.context("Sweeper task failed")?;
    let counts = result?;
    info!(judged = counts.judged, skipped = counts.skipped, "Filter input closed");
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct FilterCounts {
    judged: usize,
    skipped: usize,
}

/// Judge each NDJSON event line by the wall clock and write one verdict JSON
/// line to `out`. Malformed lines are logged and skipped.
async fn filter_stream<R, W>(
    pipeline: &FilterPipeline,
    logger: &DecisionLogger,
    reader: R,
    out: &mut W,
) -> Result<FilterCounts>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut host = SimulatedHost::new();
    let mut lines = reader.lines();
    let mut counts = FilterCounts::default();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let event: ChannelEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed event");
                counts.skipped += 1;
                continue;
            }
        };
        let now = Utc::now();
        let verdict = pipeline.handle_at(&event, &host, now).await;
        logger.log_decision(&event, &verdict, now);
        host.observe(&event);
        writeln!(out, "{}", serde_json::to_string(&verdict)?)?;
        counts.judged += 1;
    }

    Ok(counts)
}

/// Validate the config exactly as the runtime loads it and print the
/// effective values as YAML.
async fn check_config<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    let (config, report) = load_with_report(path).await?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    for error in &report.errors {
        eprintln!("error: {error}");
    }
    write!(out, "{}", serde_yaml::to_string(&config)?)?;
    if !report.is_valid() {
        anyhow::bail!("{} config error(s) in {}", report.errors.len(), path.display());
    }
    Ok(())
}

async fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists; pass --force to overwrite", path.display());
    }
    let config = apply_all_defaults(ChurnGuardConfig::default());
    write_config(&config, path).await?;
    println!("Wrote {}", path.display());
    Ok(())
}
