use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::cache::{normalize, ModelCache};
use super::{
    CatalogError, DownloadableModel, FetchOptions, MissingModelReport, MissingQuery, ModelCatalog,
};

/// Default Fuel server.
pub const FUEL_BASE_URL: &str = "https://fuel.gazebosim.org/1.0";

const CRAWL_PAGE_SIZE: usize = 100;

/// Catalog client backed by the Gazebo Fuel REST API.
///
/// Downloads install under `model_path` in the Fuel disk layout
/// (`<owner>/models/<name>`).
pub struct FuelCatalog {
    http: reqwest::blocking::Client,
    base_url: String,
    model_path: PathBuf,
}

/// Model listing as returned by the Fuel `/models` endpoint.
#[derive(Debug, Deserialize)]
struct FuelModel {
    name: String,
    owner: String,
}

impl FuelCatalog {
    /// Create a client for the default Fuel server.
    pub fn new(model_path: PathBuf) -> Result<Self, CatalogError> {
        Self::with_base_url(FUEL_BASE_URL, model_path)
    }

    /// Create a client for a specific Fuel server.
    pub fn with_base_url(base_url: &str, model_path: PathBuf) -> Result<Self, CatalogError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("fuelfetch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_path,
        })
    }

    /// Load the model cache, crawling the catalog when none exists yet.
    fn load_or_refresh_cache(&self, cache_path: &Path) -> Result<ModelCache, CatalogError> {
        let cache = ModelCache::load(cache_path)?;
        if !cache.is_empty() {
            tracing::debug!(
                "Using model cache at {} ({} listings)",
                cache_path.display(),
                cache.len()
            );
            return Ok(cache);
        }

        let cache = self.crawl_catalog()?;
        cache.save(cache_path)?;
        Ok(cache)
    }

    /// Page through the catalog's model list.
    fn crawl_catalog(&self) -> Result<ModelCache, CatalogError> {
        tracing::info!(
            "No model cache found, fetching model list from {}",
            self.base_url
        );

        let mut cache = ModelCache::default();
        for page in 1.. {
            let url = format!(
                "{}/models?page={page}&per_page={CRAWL_PAGE_SIZE}",
                self.base_url
            );
            let response = self.http.get(&url).send()?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                break; // past the last page
            }
            if !response.status().is_success() {
                return Err(CatalogError::Api {
                    status: response.status(),
                    url,
                });
            }

            let listings: Vec<FuelModel> = response.json()?;
            if listings.is_empty() {
                break;
            }

            let full_page = listings.len() == CRAWL_PAGE_SIZE;
            for listing in listings {
                cache.push_listing(listing.name, listing.owner);
            }
            if !full_page {
                break;
            }
        }

        tracing::info!("Cached {} model listings", cache.len());
        Ok(cache)
    }
}

impl ModelCatalog for FuelCatalog {
    fn query_missing(&self, query: &MissingQuery) -> Result<MissingModelReport, CatalogError> {
        let mut local = scan_local_models(&query.model_path, query.lower)?;
        if let Some(priority_dir) = &query.priority_dir {
            local.extend(scan_local_models(priority_dir, query.lower)?);
        }

        let cache = self.load_or_refresh_cache(&query.cache_path)?;

        let mut report = MissingModelReport::default();
        let mut seen = HashSet::new();
        for reference in &query.models {
            let name = reference.name();
            let key = normalize(name, query.lower);
            if !seen.insert(key.clone()) {
                continue;
            }

            if local.contains(&key) {
                tracing::debug!("Model {name} found locally");
                continue;
            }

            let authors = cache.owners_of(name, query.lower);
            if authors.is_empty() {
                report.missing.push(name.to_string());
            } else {
                report.downloadable.push(DownloadableModel {
                    name: name.to_string(),
                    authors,
                });
            }
        }

        Ok(report)
    }

    fn fetch(
        &self,
        model_name: &str,
        author_name: &str,
        options: &FetchOptions,
    ) -> Result<(), CatalogError> {
        let url = format!(
            "{}/{author_name}/models/{model_name}/tip/{model_name}.zip",
            self.base_url
        );
        tracing::debug!("GET {url}");

        let response = self.http.get(&url).send()?;
        if !response.status().is_success() {
            return Err(CatalogError::Api {
                status: response.status(),
                url,
            });
        }

        let progress = download_progress(model_name, response.content_length());
        let mut archive_bytes = Vec::new();
        let mut reader = progress.wrap_read(response);
        io::copy(&mut reader, &mut archive_bytes)?;
        progress.finish_and_clear();

        let dir_name = install_dir_name(&archive_bytes, model_name, options.sync_names)?;
        let install_dir = self
            .model_path
            .join(author_name)
            .join("models")
            .join(&dir_name);
        install_archive(&archive_bytes, &install_dir)?;
        tracing::info!("Installed {model_name} into {}", install_dir.display());

        if let Some(export_path) = &options.export_path {
            let export_dir = export_path.join(&dir_name);
            copy_dir_all(&install_dir, &export_dir)?;
            tracing::info!("Exported {model_name} to {}", export_dir.display());
        }

        Ok(())
    }
}

/// Default install location for Fuel models.
#[must_use]
pub fn default_model_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ignition/fuel"))
}

/// Default location of the model cache file.
#[must_use]
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fuelfetch/model_cache.json"))
}

/// Names of models installed under `dir`, in both the classic layout
/// (`<dir>/<model>/model.config`) and the Fuel layout
/// (`<dir>/<owner>/models/<model>`).
fn scan_local_models(dir: &Path, lower: bool) -> io::Result<HashSet<String>> {
    let mut found = HashSet::new();
    if !dir.exists() {
        return Ok(found);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if path.join("model.config").is_file() {
            found.insert(normalize(name, lower));
            continue;
        }

        let models_dir = path.join("models");
        if models_dir.is_dir() {
            for model_entry in fs::read_dir(&models_dir)? {
                let model_path = model_entry?.path();
                if !model_path.is_dir() {
                    continue;
                }
                if let Some(model_name) = model_path.file_name().and_then(|n| n.to_str()) {
                    found.insert(normalize(model_name, lower));
                }
            }
        }
    }

    Ok(found)
}

fn download_progress(model_name: &str, total: Option<u64>) -> ProgressBar {
    let progress = match total {
        Some(total) => ProgressBar::new(total).with_style(
            ProgressStyle::default_bar()
                .template("  {msg:<24} {bar:24} {bytes}/{total_bytes} ({eta})")
                .expect("valid template")
                .progress_chars("█▓░"),
        ),
        None => ProgressBar::new_spinner(),
    };
    progress.set_message(model_name.to_string());
    progress
}

/// Directory name the model installs under.
///
/// With `sync_names` the requested model name is used verbatim, so the map's
/// reference resolves on disk no matter what the archive calls itself.
fn install_dir_name(
    archive_bytes: &[u8],
    model_name: &str,
    sync_names: bool,
) -> Result<String, CatalogError> {
    if sync_names {
        return Ok(model_name.to_string());
    }

    let archive = zip::ZipArchive::new(io::Cursor::new(archive_bytes))?;
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    Ok(common_root(&names).unwrap_or_else(|| model_name.to_string()))
}

/// Extract into a staging directory next to `dest`, then swap it into place.
fn install_archive(archive_bytes: &[u8], dest: &Path) -> Result<(), CatalogError> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let staging = parent.join(format!(
        ".{}.partial",
        dest.file_name().and_then(|n| n.to_str()).unwrap_or("model")
    ));
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    extract_archive(archive_bytes, &staging)?;

    if dest.exists() {
        fs::remove_dir_all(dest)?;
    }
    fs::rename(&staging, dest)?;

    Ok(())
}

/// Extract a model archive, flattening a single top-level directory if the
/// archive nests everything under one (Fuel archives are flat; exported
/// bundles sometimes are not).
fn extract_archive(archive_bytes: &[u8], dest: &Path) -> Result<(), CatalogError> {
    let mut archive = zip::ZipArchive::new(io::Cursor::new(archive_bytes))?;
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let skip = usize::from(common_root(&names).is_some());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let entry_path = file
            .enclosed_name()
            .ok_or_else(|| CatalogError::UnsafePath(file.name().to_string()))?;

        let relative: PathBuf = entry_path.components().skip(skip).collect();
        if relative.as_os_str().is_empty() {
            continue;
        }

        let target = dest.join(&relative);
        if file.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&target)?;
            io::copy(&mut file, &mut out)?;
        }
    }

    Ok(())
}

/// The single directory every archive entry lives under, if there is one.
fn common_root(names: &[String]) -> Option<String> {
    let mut root: Option<&str> = None;
    for name in names {
        if !name.contains('/') {
            return None; // top-level file
        }
        let first = name.split('/').next()?;
        match root {
            None => root = Some(first),
            Some(r) if r == first => {}
            Some(_) => return None,
        }
    }
    root.map(str::to_string)
}

fn copy_dir_all(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
