use std::collections::BTreeSet;

use crate::refs::extract::ExtractedReferences;
use crate::refs::reference::{AuthorHints, ModelReference};

/// Canonical input for the catalog's missing-model query: the deterministic
/// universe of potentially needed models, plus the author hint table carried
/// forward for later disambiguation.
#[derive(Debug, Clone, Default)]
pub struct ResolutionRequest {
    pub models: BTreeSet<ModelReference>,
    pub hints: AuthorHints,
}

impl ResolutionRequest {
    /// Fold extracted references into the query contract.
    ///
    /// Pure data transformation; bare and qualified references to the same
    /// name remain distinct members.
    #[must_use]
    pub fn reconcile(extracted: ExtractedReferences) -> Self {
        let ExtractedReferences { references, hints } = extracted;
        Self {
            models: references.into_iter().collect(),
            hints,
        }
    }
}
