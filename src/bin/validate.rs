use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use addon_views::config::DEFAULT_LOG_FILTER;
use addon_views::source::validate_with_schema;

#[derive(Parser)]
#[command(name = "addon-views-validate")]
#[command(version, about = "Validate a JSON data file against a JSON Schema file")]
struct Cli {
    /// JSON Schema to validate against
    schema_path: PathBuf,

    /// Release list or add-on document to check
    data_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    validate_with_schema(&cli.schema_path, &cli.data_path).inspect_err(|e| error!("{}", e))?;

    info!("{:?} is valid", cli.data_path);
    Ok(())
}
