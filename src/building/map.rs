use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{FetchError, Result};

/// A single model placed on a level.
///
/// `model_name` may carry an author qualifier (`author/name`); splitting that
/// apart is the reference extractor's job, not the parser's.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelPlacement {
    pub model_name: String,
    /// Instance name given by the map author.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub yaw: f64,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

/// One building level and the models placed on it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub elevation: f64,
    #[serde(default)]
    pub models: Vec<ModelPlacement>,
}

/// Parsed building map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Building {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub levels: BTreeMap<String, Level>,
}

/// Building map parser. Construct one per run; it keeps no state between
/// parses.
#[derive(Debug, Default)]
pub struct MapParser;

impl MapParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a building map document.
    pub fn parse_str(&self, raw: &str) -> Result<Building> {
        serde_yaml::from_str(raw).map_err(|e| FetchError::Map(e.to_string()))
    }

    /// Parse a building map file.
    pub fn parse_file(&self, path: &Path) -> Result<Building> {
        if !path.is_file() {
            return Err(FetchError::InputNotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        self.parse_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name: test_building
levels:
  L1:
    elevation: 0
    vertices:
      - [10.0, 20.0, 0.0, ""]
    models:
      - model_name: OpenRobotics/AdjTable
        name: AdjTable_1
        static: true
        x: 10.2
        y: -5.3
        z: 0.0
        yaw: 1.57
      - model_name: Lamp
        name: Lamp_1
        x: 3.0
        y: 4.0
  L2:
    elevation: 3.5
lifts: {}
"#;

    #[test]
    fn test_parse_sample_building() {
        let building = MapParser::new().parse_str(SAMPLE).unwrap();
        assert_eq!(building.name, "test_building");
        assert_eq!(building.levels.len(), 2);

        let l1 = &building.levels["L1"];
        assert_eq!(l1.models.len(), 2);
        assert_eq!(l1.models[0].model_name, "OpenRobotics/AdjTable");
        assert_eq!(l1.models[0].name, "AdjTable_1");
        assert!(l1.models[0].is_static);
        assert_eq!(l1.models[1].model_name, "Lamp");
        assert!(!l1.models[1].is_static);
    }

    #[test]
    fn test_level_without_models_defaults_empty() {
        let building = MapParser::new().parse_str(SAMPLE).unwrap();
        assert!(building.levels["L2"].models.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let raw = "name: b\nlevels: {}\nsomething_new: [1, 2, 3]\n";
        let building = MapParser::new().parse_str(raw).unwrap();
        assert!(building.levels.is_empty());
    }

    #[test]
    fn test_invalid_document_is_a_map_error() {
        let result = MapParser::new().parse_str("levels: [not, a, mapping]");
        assert!(matches!(result, Err(FetchError::Map(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = MapParser::new().parse_file(Path::new("/nonexistent/building.yaml"));
        assert!(matches!(result, Err(FetchError::InputNotFound(_))));
    }
}
