use crate::catalog::{DownloadableModel, MissingModelReport};
use crate::refs::AuthorHints;

/// A downloadable model with its chosen author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub name: String,
    pub author: String,
    /// Whether the author came from an explicit map declaration.
    pub hinted: bool,
}

/// Downloads ready to run, plus the models resolvable nowhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionOutcome {
    /// In catalog report order.
    pub downloads: Vec<ResolvedDownload>,
    pub missing: Vec<String>,
}

/// Pick one author per downloadable entry, in report order.
///
/// An author declared in the map wins over the catalog's candidate list;
/// otherwise the first candidate is used and a warning notes the default.
/// An entry with no candidate at all is demoted to the missing report.
#[must_use]
pub fn resolve_downloads(report: MissingModelReport, hints: &AuthorHints) -> ResolutionOutcome {
    let mut outcome = ResolutionOutcome {
        downloads: Vec::with_capacity(report.downloadable.len()),
        missing: report.missing,
    };

    for DownloadableModel { name, authors } in report.downloadable {
        if let Some(author) = hints.author_for(&name) {
            tracing::info!("Downloading {name} by {author} from Fuel");
            outcome.downloads.push(ResolvedDownload {
                name,
                author: author.to_string(),
                hinted: true,
            });
        } else if let Some(author) = authors.into_iter().next() {
            tracing::info!("Downloading {name} by {author} from Fuel");
            tracing::warn!("No author specified for model '{name}', using first valid author '{author}'");
            outcome.downloads.push(ResolvedDownload {
                name,
                author,
                hinted: false,
            });
        } else {
            tracing::warn!("Catalog listed '{name}' as downloadable without any author, treating as missing");
            outcome.missing.push(name);
        }
    }

    outcome
}
