use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Main error type for fuelfetch
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Input file not found: {0}\n\nTroubleshooting:\n- Check the path to your building map file\n- The argument must point at a traffic-editor .building.yaml file")]
    InputNotFound(PathBuf),

    #[error("Failed to parse building map: {0}\n\nTroubleshooting:\n- Verify the file is valid YAML\n- Check it was saved by traffic-editor (levels with model placements)\n- Run with RUST_LOG=debug for more details")]
    Map(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;
