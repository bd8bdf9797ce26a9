//! Model reference extraction and reconciliation
//!
//! Turns the raw names a building map mentions into the canonical set the
//! catalog query consumes, plus the author hint table used to break ties when
//! several authors publish a model of the same name.

pub mod extract;
pub mod reconcile;
pub mod reference;

pub use extract::{extract_references, ExtractedReferences};
pub use reconcile::ResolutionRequest;
pub use reference::{AuthorHints, ModelReference};
