use std::collections::HashSet;

use crate::building::Building;
use crate::refs::reference::{AuthorHints, ModelReference};

/// References and author hints harvested from one building map.
#[derive(Debug, Clone, Default)]
pub struct ExtractedReferences {
    pub references: HashSet<ModelReference>,
    pub hints: AuthorHints,
}

/// Collect every model the building references: crowd-sim actors from the raw
/// document plus placements from every level. Qualified placements also feed
/// the author hint table.
#[must_use]
pub fn extract_references(building: &Building, raw: &str) -> ExtractedReferences {
    let mut extracted = ExtractedReferences::default();

    for name in crowd_sim_models(raw) {
        extracted.references.insert(ModelReference::Bare(name));
    }

    for level in building.levels.values() {
        for placement in &level.models {
            let reference = ModelReference::parse(&placement.model_name);
            if let ModelReference::Qualified { author, name } = &reference {
                extracted.hints.declare(name, author);
            }
            extracted.references.insert(reference);
        }
    }

    extracted
}

/// Crowd-sim actor model names from the raw map document.
///
/// The crowd_sim block is optional and written by a separate tool, so any
/// structural surprise degrades to zero actors instead of failing the run.
fn crowd_sim_models(raw: &str) -> Vec<String> {
    match parse_crowd_sim(raw) {
        Ok(names) => {
            if names.is_empty() {
                tracing::debug!("No crowd_sim models declared in map");
            } else {
                tracing::info!("Models {names:?} are used in crowd_sim");
            }
            names
        }
        Err(reason) => {
            tracing::warn!("Could not get crowd_sim models ({reason}). Ignoring models in crowd_sim...");
            Vec::new()
        }
    }
}

fn parse_crowd_sim(raw: &str) -> std::result::Result<Vec<String>, String> {
    let doc: serde_yaml::Value = serde_yaml::from_str(raw).map_err(|e| e.to_string())?;
    let Some(crowd_sim) = doc.get("crowd_sim") else {
        return Ok(Vec::new());
    };
    let model_types = crowd_sim
        .get("model_types")
        .and_then(serde_yaml::Value::as_sequence)
        .ok_or("crowd_sim.model_types is not a list")?;

    let mut names = Vec::with_capacity(model_types.len());
    for model in model_types {
        let uri = model
            .get("model_uri")
            .and_then(serde_yaml::Value::as_str)
            .ok_or("model_types entry without a model_uri string")?;
        names.push(actor_name_from_uri(uri));
    }
    Ok(names)
}

/// Path component after the scheme delimiter, e.g. `model://Human` -> `Human`.
fn actor_name_from_uri(uri: &str) -> String {
    uri.split("://").last().unwrap_or(uri).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::MapParser;

    const MAP_WITH_CROWD_SIM: &str = r#"
name: sim_world
levels:
  L1:
    models:
      - model_name: alice/robot
        name: robot_1
      - model_name: Lamp
        name: lamp_1
crowd_sim:
  enable: 1
  model_types:
    - typename: human
      model_uri: "model://MaleVisitor"
    - typename: guide
      model_uri: "model://FemaleGuide"
"#;

    fn extract(raw: &str) -> ExtractedReferences {
        let building = MapParser::new().parse_str(raw).unwrap();
        extract_references(&building, raw)
    }

    #[test]
    fn test_extracts_placements_and_actors() {
        let extracted = extract(MAP_WITH_CROWD_SIM);
        assert!(extracted
            .references
            .contains(&ModelReference::Bare("MaleVisitor".to_string())));
        assert!(extracted
            .references
            .contains(&ModelReference::Bare("FemaleGuide".to_string())));
        assert!(extracted
            .references
            .contains(&ModelReference::Bare("Lamp".to_string())));
        assert!(extracted.references.contains(&ModelReference::Qualified {
            author: "alice".to_string(),
            name: "robot".to_string(),
        }));
        assert_eq!(extracted.references.len(), 4);
    }

    #[test]
    fn test_qualified_placements_feed_hints() {
        let extracted = extract(MAP_WITH_CROWD_SIM);
        assert_eq!(extracted.hints.author_for("robot"), Some("alice"));
        assert_eq!(extracted.hints.len(), 1);
    }

    #[test]
    fn test_bare_placements_never_appear_in_hints() {
        let extracted = extract(MAP_WITH_CROWD_SIM);
        assert_eq!(extracted.hints.author_for("Lamp"), None);
        assert_eq!(extracted.hints.author_for("MaleVisitor"), None);
    }

    #[test]
    fn test_absent_crowd_sim_contributes_nothing() {
        let raw = "levels:\n  L1:\n    models:\n      - model_name: Lamp\n";
        let extracted = extract(raw);
        assert_eq!(extracted.references.len(), 1);
    }

    #[test]
    fn test_malformed_crowd_sim_degrades_to_zero_actors() {
        let raw = "levels:\n  L1:\n    models:\n      - model_name: Lamp\ncrowd_sim:\n  model_types: not_a_list\n";
        let extracted = extract(raw);
        assert_eq!(extracted.references.len(), 1);
        assert!(extracted
            .references
            .contains(&ModelReference::Bare("Lamp".to_string())));
    }

    #[test]
    fn test_crowd_sim_entry_without_uri_is_malformed() {
        let raw = "levels: {}\ncrowd_sim:\n  model_types:\n    - typename: human\n";
        let extracted = extract(raw);
        assert!(extracted.references.is_empty());
    }

    #[test]
    fn test_actor_name_from_uri() {
        assert_eq!(actor_name_from_uri("model://Human"), "Human");
        assert_eq!(actor_name_from_uri("Human"), "Human");
        assert_eq!(actor_name_from_uri("https://example.org/Human"), "example.org/Human");
    }
}
