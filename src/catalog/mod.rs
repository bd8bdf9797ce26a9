//! Remote model catalog
//!
//! The `ModelCatalog` trait is the seam between the resolution pipeline and
//! whatever serves the models; `FuelCatalog` is the real client backed by the
//! Gazebo Fuel REST API.

pub mod cache;
pub mod fuel;

use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

use crate::refs::ModelReference;

pub use cache::{CachedModel, ModelCache};
pub use fuel::FuelCatalog;

/// Parameters for a missing-model query.
#[derive(Debug, Clone)]
pub struct MissingQuery {
    /// Universe of potentially needed models, bare and qualified mixed.
    pub models: BTreeSet<ModelReference>,
    /// Directory models are installed into and checked against.
    pub model_path: PathBuf,
    /// Location of the catalog's model cache file.
    pub cache_path: PathBuf,
    /// Match model names case-insensitively.
    pub lower: bool,
    /// Directory searched before the install path and the catalog.
    pub priority_dir: Option<PathBuf>,
}

/// A model absent locally but present in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadableModel {
    pub name: String,
    /// Authors publishing a model of this name, in catalog order.
    pub authors: Vec<String>,
}

/// Outcome of a missing-model query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingModelReport {
    /// Ordered; download progress is reported against this order.
    pub downloadable: Vec<DownloadableModel>,
    /// Found in neither local storage, priority directory, nor catalog.
    pub missing: Vec<String>,
}

/// Per-fetch options.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Name the installed directory exactly after the requested model.
    pub sync_names: bool,
    /// Also mirror the model into a classic gazebo directory layout.
    pub export_path: Option<PathBuf>,
}

/// Unified interface to the remote model catalog.
pub trait ModelCatalog {
    /// Partition the requested models into locally present, downloadable,
    /// and missing.
    fn query_missing(&self, query: &MissingQuery) -> Result<MissingModelReport, CatalogError>;

    /// Download one model by name and author. Blocking; one call per model.
    fn fetch(
        &self,
        model_name: &str,
        author_name: &str,
        options: &FetchOptions,
    ) -> Result<(), CatalogError>;
}

/// Catalog-side errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP error: {0}\n\nTroubleshooting:\n- Check internet connection\n- Verify the Fuel server is reachable\n- Try again in a moment")]
    Http(#[from] reqwest::Error),

    #[error("Fuel API returned {status} for {url}")]
    Api {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Model archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Model archive entry has an unsafe path: {0}")]
    UnsafePath(String),

    #[error("Model cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
