//! optidash: optimize a directory of images through the Optidash API.

use clap::{ArgGroup, Parser};
use futures::stream;
use optidash_cli::output::{format_duration, Status};
use optidash_cli::progress;
use optidash_core::config::Config;
use optidash_core::error::exit_codes;
use optidash_core::format::format_count;
use optidash_core::{Compression, Error, ErrorCode};
use optidash_pipeline::{OptimizeStage, RunSummary, StageOptions, DEFAULT_CHANNEL_CAPACITY};
use optidash_telemetry::{metrics, TelemetryConfig, Timer};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod discover;
mod reporter;
mod writer;

use discover::discover;
use reporter::ConsoleReporter;
use writer::Destination;

/// Optimize images with the Optidash API
#[derive(Parser)]
#[command(name = "optidash")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("destination").required(true).args(["out", "in_place"])))]
struct Cli {
    /// File or directory to optimize
    source: PathBuf,

    /// Write results under this directory, mirroring the source layout
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Overwrite the source files
    #[arg(long)]
    in_place: bool,

    /// Optidash API key
    #[arg(short, long, env = "OPTIDASH_API_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Compression level (low, medium, high)
    #[arg(short, long, value_name = "LEVEL")]
    compression: Option<Compression>,

    /// Maximum uploads in flight; values below 1 mean 1
    #[arg(short = 'j', long, value_name = "N", allow_negative_numbers = true)]
    concurrency: Option<i64>,

    /// Path to optidash.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Print collected metrics as JSON on stderr
    #[arg(long)]
    metrics: bool,
}

impl Cli {
    fn destination(&self) -> Destination {
        match &self.out {
            Some(dir) => Destination::Directory(dir.clone()),
            None => Destination::InPlace,
        }
    }

    fn stage_options(&self, config: &Config) -> StageOptions {
        let mut options = StageOptions::from(&config.schema);
        if let Some(key) = &self.key {
            options = options.api_key(key.clone());
        }
        if let Some(compression) = self.compression {
            options = options.compression(compression);
        }
        if let Some(limit) = self.concurrency {
            options = options.concurrency(limit);
        }
        options
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = report_error(&err, json);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?.with_env();

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.schema.logging.level.clone()
    };
    optidash_telemetry::init_with_config(
        TelemetryConfig::with_level(level).json(config.schema.logging.json),
    )?;

    let stage = OptimizeStage::new(cli.stage_options(&config)).map_err(Error::from)?;
    let destination = cli.destination();

    let discovered = discover(&cli.source)?;
    let registry = metrics();
    registry.increment_by("files_discovered", discovered.items.len() as u64);
    registry.gauge("concurrency", stage.config().concurrency() as u64);
    tracing::debug!(
        base = %discovered.base.display(),
        compression = %stage.config().compression(),
        concurrency = stage.config().concurrency(),
        "Starting run"
    );

    let bar = if cli.json {
        progress::hidden()
    } else {
        progress::file_progress(discovered.non_empty())
    };
    let stage = stage.with_reporter(ConsoleReporter::new(bar.clone(), cli.json));

    let timer = Timer::start("run_ms");
    let (mut rx, handle) = stage.spawn(stream::iter(discovered.items), DEFAULT_CHANNEL_CAPACITY);

    let mut written = 0u64;
    while let Some(item) = rx.recv().await {
        match destination.write(&item).await {
            Ok(Some(_)) => written += 1,
            Ok(None) => {}
            Err(err) => {
                drop(rx);
                handle.abort();
                progress::finish_error(&bar, "Write failed");
                return Err(err.into());
            }
        }
    }

    let outcome = handle
        .await
        .map_err(|e| Error::new(ErrorCode::Internal, format!("Stage task failed: {e}")))?;
    let elapsed = timer.stop();

    let summary = match outcome {
        Ok(summary) => summary,
        Err(err) => {
            progress::finish_error(&bar, "Aborted");
            return Err(Error::from(err).into());
        }
    };
    progress::finish_success(&bar, "Done");

    print_summary(&cli, &summary, written, elapsed);
    if cli.metrics {
        eprintln!("{}", serde_json::to_string_pretty(&metrics().export_json())?);
    }

    Ok(())
}

fn print_summary(cli: &Cli, summary: &RunSummary, written: u64, elapsed: std::time::Duration) {
    if cli.json {
        match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{json}"),
            Err(e) => Status::error(&format!("Could not serialize summary: {e}")),
        }
        return;
    }

    Status::success(&format!("{} in {}", summary.message(), format_duration(elapsed)));
    let files = format_count(written, "file", "files");
    match &cli.out {
        Some(dir) => Status::info(&format!("Wrote {} to {}", files, dir.display())),
        None => Status::info(&format!("Rewrote {} in place", files)),
    }
}

/// Print `err` and return the exit code for its category
///
/// With `json`, the error report also goes to stdout in place of the summary.
fn report_error(err: &anyhow::Error, json: bool) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(core) => {
            if json {
                match serde_json::to_string_pretty(&core.to_report()) {
                    Ok(report) => println!("{report}"),
                    Err(e) => Status::error(&format!("Could not serialize error: {e}")),
                }
            }
            eprintln!("{} {}", "Error:".red().bold(), core.message);
            if let Some(context) = &core.context {
                eprintln!("  {}", context.dimmed());
            }
            if let Some(suggestion) = &core.suggestion {
                Status::hint(suggestion);
            }
            core.exit_code()
        }
        None => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            exit_codes::FAILURE
        }
    }
}
