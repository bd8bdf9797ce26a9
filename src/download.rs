use crate::catalog::{FetchOptions, ModelCatalog};
use crate::resolve::ResolutionOutcome;

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    /// Models whose fetch failed.
    pub failed: Vec<String>,
    /// Models resolvable nowhere.
    pub missing: Vec<String>,
}

/// Fetch every resolved model in order, then surface the unresolvable ones.
///
/// A failed fetch is logged and does not block later fetches; retries are the
/// catalog client's concern, not the driver's.
pub fn run_downloads(
    catalog: &dyn ModelCatalog,
    outcome: ResolutionOutcome,
    options: &FetchOptions,
) -> RunSummary {
    let total = outcome.downloads.len();
    let mut summary = RunSummary {
        missing: outcome.missing,
        ..Default::default()
    };

    for (index, download) in outcome.downloads.into_iter().enumerate() {
        tracing::info!(
            "Downloading model {} / {total} : {}",
            index + 1,
            download.name
        );
        summary.attempted += 1;

        if let Err(e) = catalog.fetch(&download.name, &download.author, options) {
            tracing::error!(
                "Failed to download {} by {}: {e}",
                download.name,
                download.author
            );
            summary.failed.push(download.name);
        }
    }

    if !summary.missing.is_empty() {
        tracing::warn!("Missing models (not in local or Fuel): {:?}", summary.missing);
    }

    summary
}
