use crate::compute::geojson::{Ingested, ingest_feature_collection};
use crate::error::{BloomError, Result};
use crate::source::prediction::PredictionQuery;
use std::time::Duration;

/// Fetches datasets and predictions over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    api_base_url: String,
}

impl HttpSource {
    pub fn new(api_base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(api_base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base_url: api_base_url.into(),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Fetch and ingest a GeoJSON document.
    pub async fn fetch_dataset(&self, url: &str) -> Result<Ingested> {
        let body = self.get_text(url).await?;
        ingest_feature_collection(&body)
    }

    /// Run a prediction query. An empty response is not an error here.
    pub async fn fetch_predictions(&self, query: &PredictionQuery) -> Result<Ingested> {
        query.validate()?;
        let url = query.url(&self.api_base_url)?;
        log::info!("Fetching predictions from {}", url);
        let body = self.get_text(url.as_str()).await?;
        ingest_feature_collection(&body)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BloomError::Network(format!("HTTP {} from {}", status, url)));
        }
        Ok(response.text().await?)
    }
}
