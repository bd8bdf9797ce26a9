use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::CatalogError;

/// One catalog listing: a model name published by an owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedModel {
    pub name: String,
    pub owner: String,
}

/// On-disk cache of the catalog's model listings.
///
/// Listings keep catalog crawl order; candidate-author lists derived from the
/// cache inherit that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCache {
    pub models: Vec<CachedModel>,
    pub last_updated: String,
}

impl Default for ModelCache {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            last_updated: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl ModelCache {
    /// Load cache from file; a missing file yields an empty cache.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;

        serde_json::from_str(&content)
            .map_err(|e| CatalogError::Cache(format!("Failed to parse model cache: {e}")))
    }

    /// Save cache to file atomically (tmp + rename).
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::Cache(format!("Failed to serialize model cache: {e}")))?;

        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    /// Record a listing, keeping crawl order.
    pub fn push_listing(&mut self, name: String, owner: String) {
        self.models.push(CachedModel { name, owner });
        self.last_updated = chrono::Utc::now().to_rfc3339();
    }

    /// All owners publishing `name`, in cache order.
    #[must_use]
    pub fn owners_of(&self, name: &str, lower: bool) -> Vec<String> {
        let wanted = normalize(name, lower);
        self.models
            .iter()
            .filter(|m| normalize(&m.name, lower) == wanted)
            .map(|m| m.owner.clone())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }
}

pub(crate) fn normalize(name: &str, lower: bool) -> String {
    if lower {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ModelCache {
        let mut cache = ModelCache::default();
        cache.push_listing("Robot".to_string(), "bob".to_string());
        cache.push_listing("robot".to_string(), "alice".to_string());
        cache.push_listing("Lamp".to_string(), "carol".to_string());
        cache
    }

    #[test]
    fn test_default_cache_is_empty() {
        let cache = ModelCache::default();
        assert!(cache.is_empty());
        assert!(!cache.last_updated.is_empty());
    }

    #[test]
    fn test_owners_preserve_cache_order() {
        let cache = sample();
        assert_eq!(cache.owners_of("robot", true), vec!["bob", "alice"]);
    }

    #[test]
    fn test_owners_case_sensitive_lookup() {
        let cache = sample();
        assert_eq!(cache.owners_of("robot", false), vec!["alice"]);
        assert_eq!(cache.owners_of("Robot", false), vec!["bob"]);
    }

    #[test]
    fn test_owners_of_unknown_model() {
        let cache = sample();
        assert!(cache.owners_of("ghost_model", true).is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("model_cache.json");

        let cache = sample();
        cache.save(&cache_path).unwrap();
        assert!(cache_path.exists());

        let loaded = ModelCache::load(&cache_path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.models[0].name, "Robot");
        assert_eq!(loaded.models[0].owner, "bob");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("nested/dir/model_cache.json");

        sample().save(&cache_path).unwrap();
        assert!(cache_path.exists());
    }

    #[test]
    fn test_load_nonexistent_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ModelCache::load(&temp_dir.path().join("missing.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_corrupt_cache_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("model_cache.json");
        fs::write(&cache_path, "{ not json").unwrap();

        let result = ModelCache::load(&cache_path);
        assert!(matches!(result, Err(CatalogError::Cache(_))));
    }
}
