//! Where datasets come from: local GeoJSON files, named catalog entries and,
//! with the `http` feature, remote URLs and the prediction service.

use crate::compute::geojson::{Ingested, ingest_feature_collection};
use crate::config::Config;
use crate::error::{BloomError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[cfg(feature = "http")]
mod http;
mod prediction;

#[cfg(feature = "http")]
pub use http::HttpSource;
pub use prediction::{AreaOfInterest, PredictionOutcome, PredictionQuery};

/// Read and ingest a GeoJSON file.
pub fn load_dataset_file<P: AsRef<Path>>(path: P) -> Result<Ingested> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    log::debug!("Read {} bytes from {}", text.len(), path.display());
    ingest_feature_collection(&text)
}

/// Named datasets, resolved against an optional root directory.
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    root: Option<PathBuf>,
    entries: BTreeMap<String, PathBuf>,
}

impl DatasetCatalog {
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: None,
            entries: config.datasets.clone(),
        }
    }

    /// Resolve relative entries against `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let path = self
            .entries
            .get(name)
            .ok_or_else(|| BloomError::InvalidInput(format!("Unknown dataset `{}`", name)))?;
        Ok(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.clone(),
        })
    }

    pub fn load(&self, name: &str) -> Result<Ingested> {
        load_dataset_file(self.resolve(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SITES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [-99.13, 19.43]},
             "properties": {"Family": "Apocynaceae", "Genus": "Asclepias", "Season": "Spring", "year": 2000, "Area": 12.0}},
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [-99.13, 19.43]},
             "properties": {"Genus": "Nameless", "Season": "Spring", "year": 2000}}
        ]
    }"#;

    #[test]
    fn test_load_dataset_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SITES.as_bytes()).unwrap();

        let ingested = load_dataset_file(file.path()).unwrap();
        assert_eq!(ingested.records.len(), 1);
        assert_eq!(ingested.dropped, 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_dataset_file("/nonexistent/bloomscope/sites.geojson").unwrap_err();
        assert!(matches!(err, BloomError::Io(_)));
    }

    #[test]
    fn test_catalog_resolution() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/sites.geojson"), SITES).unwrap();

        let config = Config::default().with_dataset("sites", "data/sites.geojson");
        let catalog = DatasetCatalog::from_config(&config).with_root(dir.path());

        assert!(catalog.names().any(|name| name == "flowering_sites"));
        assert_eq!(catalog.load("sites").unwrap().records.len(), 1);

        let err = catalog.resolve("missing").unwrap_err();
        assert!(matches!(err, BloomError::InvalidInput(_)));
    }
}
