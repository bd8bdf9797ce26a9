use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fuelfetch::catalog::fuel::{default_cache_path, default_model_path};
use fuelfetch::catalog::FuelCatalog;
use fuelfetch::pipeline::{download_models, PipelineOptions};

#[derive(Parser)]
#[command(name = "fuelfetch")]
#[command(
    about = "Parse traffic-editor building files to find missing models and download them from Fuel",
    long_about = None
)]
struct Cli {
    /// Input building.yaml file to process
    input_yaml: PathBuf,

    /// DEPRECATED: no longer in use, kept for backward compatibility
    #[arg(short = 'm', long = "model-path")]
    model_path: Option<PathBuf>,

    /// Path to the model cache
    #[arg(short, long)]
    cache: Option<PathBuf>,

    /// DEPRECATED: no longer in use, kept for backward compatibility
    #[arg(short = 'f', long = "fuel-tools")]
    fuel_tools: bool,

    /// Search this directory first for models
    #[arg(short, long)]
    include: Option<PathBuf>,

    /// Export downloaded models to a folder with the classic gazebo directory structure
    #[arg(short, long)]
    export_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if cli.model_path.is_some() || cli.fuel_tools {
        tracing::warn!("DEPRECATED: the options -f and -m are no longer in use. Please remove these.");
    }

    let model_path = default_model_path().context("Could not determine home directory")?;
    let cache_path = match cli.cache {
        Some(path) => path,
        None => default_cache_path().context("Could not determine home directory")?,
    };

    let catalog = FuelCatalog::new(model_path.clone())?;
    let options = PipelineOptions {
        model_path,
        cache_path,
        priority_dir: cli.include,
        export_path: cli.export_path,
    };

    let summary = download_models(&cli.input_yaml, &catalog, &options)?;
    if !summary.failed.is_empty() {
        tracing::warn!(
            "{} of {} downloads failed: {:?}",
            summary.failed.len(),
            summary.attempted,
            summary.failed
        );
    }

    Ok(())
}
