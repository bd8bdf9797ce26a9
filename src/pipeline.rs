use std::fs;
use std::path::{Path, PathBuf};

use crate::building::MapParser;
use crate::catalog::{FetchOptions, MissingQuery, ModelCatalog};
use crate::download::{run_downloads, RunSummary};
use crate::error::{FetchError, Result};
use crate::refs::{extract_references, ResolutionRequest};
use crate::resolve::resolve_downloads;

/// Run configuration assembled by the CLI.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory models are installed into and checked against.
    pub model_path: PathBuf,
    /// Location of the catalog's model cache file.
    pub cache_path: PathBuf,
    /// Directory searched for models before consulting the catalog.
    pub priority_dir: Option<PathBuf>,
    /// Mirror downloads into a classic gazebo directory layout.
    pub export_path: Option<PathBuf>,
}

/// Download every model a building map needs.
///
/// One forward pass: extract references, reconcile names, query the catalog,
/// drive the downloads. Only a missing input file, an unparseable map, or a
/// failed catalog query abort the run; everything downstream degrades to
/// warnings.
pub fn download_models(
    input: &Path,
    catalog: &dyn ModelCatalog,
    options: &PipelineOptions,
) -> Result<RunSummary> {
    if !input.is_file() {
        return Err(FetchError::InputNotFound(input.to_path_buf()));
    }
    let raw = fs::read_to_string(input)?;

    let parser = MapParser::new();
    let building = parser.parse_str(&raw)?;
    tracing::info!(
        "Parsed building '{}' with {} levels",
        building.name,
        building.levels.len()
    );

    let extracted = extract_references(&building, &raw);
    let request = ResolutionRequest::reconcile(extracted);

    let report = catalog.query_missing(&MissingQuery {
        models: request.models,
        model_path: options.model_path.clone(),
        cache_path: options.cache_path.clone(),
        lower: true,
        priority_dir: options.priority_dir.clone(),
    })?;

    tracing::info!(
        "Requested model report: {} downloadable, {} missing",
        report.downloadable.len(),
        report.missing.len()
    );
    for (name, author) in request.hints.iter() {
        tracing::info!("Model '{name}' has specified author '{author}'");
    }

    let outcome = resolve_downloads(report, &request.hints);

    let fetch_options = FetchOptions {
        sync_names: true,
        export_path: options.export_path.clone(),
    };
    Ok(run_downloads(catalog, outcome, &fetch_options))
}
