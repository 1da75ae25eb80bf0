use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use addon_views::config::{DEFAULT_LOG_FILTER, TransformConfig, log_filter};
use addon_views::run_transformation;

#[derive(Parser)]
#[command(name = "addon-views")]
#[command(version, about = "Generate per-release add-on views from add-on metadata")]
struct Cli {
    /// JSON list of releases with their API versions
    release_file: PathBuf,

    /// Directory of `<addonId>/<version>.json` documents
    source_dir: PathBuf,

    /// Output directory, must not exist
    output_dir: PathBuf,

    /// Log level (debug, info, warning, error, critical); RUST_LOG takes precedence
    #[arg(long)]
    loglevel: Option<String>,
}

fn init_tracing(loglevel: Option<&str>) -> anyhow::Result<WorkerGuard> {
    let level = match loglevel {
        Some(level) => log_filter(level).with_context(|| format!("Unknown log level {level:?}"))?,
        None => DEFAULT_LOG_FILTER,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .init();

    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.loglevel.as_deref())?;

    let config = TransformConfig::new(cli.release_file, cli.source_dir, cli.output_dir);
    let summary = run_transformation(&config).inspect_err(|e| error!("{}", e))?;

    info!(
        "Transformation complete: {} releases, {} API versions, {} add-ons read, {} skipped, {} views written",
        summary.releases,
        summary.api_versions,
        summary.packages_read,
        summary.packages_skipped,
        summary.views_written
    );
    Ok(())
}
