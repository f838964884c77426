//! Config and dataset loading for the host.

use bloomscope::compute::geojson::Ingested;
use bloomscope::{BloomError, Config, DatasetCatalog, HttpSource, load_dataset_file};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Engine(#[from] BloomError),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

/// Where the initial dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// An entry of `Config::datasets`.
    Named(String),
    File(PathBuf),
    Url(String),
}

/// Read a JSON or TOML config, chosen by file extension.
pub fn load_config(path: &Path) -> Result<Config, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Config::from_toml(&text).map_err(|e| e.to_string()),
        _ => Config::from_json(&text).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| LoadError::ConfigParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Fetch and ingest the dataset named by `source`.
pub async fn load_records(source: &DatasetSource, config: &Config) -> Result<Ingested, LoadError> {
    let ingested = match source {
        DatasetSource::Named(name) => DatasetCatalog::from_config(config).load(name)?,
        DatasetSource::File(path) => load_dataset_file(path)?,
        DatasetSource::Url(url) => {
            HttpSource::new(config.api_base_url.clone())?
                .fetch_dataset(url)
                .await?
        }
    };
    Ok(ingested)
}
