//! Requests for the bloom prediction service.

use crate::compute::validation::{validate_confidence, validate_location};
use crate::error::{BloomError, Result};
use bloomscope_types::timeline::TimelineStep;
use geo::Point;
use serde::{Deserialize, Serialize};
use url::Url;

/// Where predictions are requested for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "aoi_type", rename_all = "snake_case")]
pub enum AreaOfInterest {
    Point { lat: f64, lon: f64 },
    State { country: String, state: String },
    Country { country: String },
}

impl AreaOfInterest {
    pub fn point(lat: f64, lon: f64) -> Self {
        AreaOfInterest::Point { lat, lon }
    }

    /// A state of Mexico, the only country the service resolves states for.
    pub fn state(state: impl Into<String>) -> Self {
        AreaOfInterest::State {
            country: "Mexico".to_string(),
            state: state.into(),
        }
    }

    pub fn country(country: impl Into<String>) -> Self {
        AreaOfInterest::Country {
            country: country.into(),
        }
    }

    /// Value of the `aoi_type` query parameter.
    pub fn kind(&self) -> &'static str {
        match self {
            AreaOfInterest::Point { .. } => "point",
            AreaOfInterest::State { .. } => "state",
            AreaOfInterest::Country { .. } => "country",
        }
    }
}

/// A prediction request over one or more timeline steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionQuery {
    pub area: AreaOfInterest,
    pub start: TimelineStep,
    /// Last step of the range. `None` means the start step alone.
    #[serde(default)]
    pub end: Option<TimelineStep>,
    /// Minimum confidence, in [0, 1].
    pub confidence: f64,
    pub num_predictions: u32,
    #[serde(default = "PredictionQuery::default_method")]
    pub method: String,
}

impl PredictionQuery {
    fn default_method() -> String {
        "v2".to_string()
    }

    pub fn new(area: AreaOfInterest, start: TimelineStep) -> Self {
        Self {
            area,
            start,
            end: None,
            confidence: 0.5,
            num_predictions: 100,
            method: Self::default_method(),
        }
    }

    pub fn with_end(mut self, end: TimelineStep) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_num_predictions(mut self, count: u32) -> Self {
        self.num_predictions = count;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_confidence(self.confidence)?;
        if self.num_predictions == 0 {
            return Err(BloomError::InvalidInput(
                "num_predictions must be at least 1".to_string(),
            ));
        }
        if let Some(end) = self.end
            && end < self.start
        {
            return Err(BloomError::InvalidInput(format!(
                "end step {} is before start step {}",
                end, self.start
            )));
        }

        match &self.area {
            AreaOfInterest::Point { lat, lon } => validate_location(&Point::new(*lon, *lat)),
            AreaOfInterest::State { country, state } => {
                non_blank("aoi_country", country)?;
                non_blank("aoi_state", state)
            }
            AreaOfInterest::Country { country } => non_blank("aoi_country", country),
        }
    }

    /// Query parameters in the order the service documents them.
    ///
    /// `end_date` appears only when it differs from `start_date`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let start_date = self.start.start_date();
        let end_date = self.end.unwrap_or(self.start).start_date();

        let mut pairs = vec![
            ("aoi_type", self.area.kind().to_string()),
            ("start_date", start_date.clone()),
            ("method", self.method.clone()),
            ("confidence", self.confidence.to_string()),
            ("num_predictions", self.num_predictions.to_string()),
        ];
        if end_date != start_date {
            pairs.push(("end_date", end_date));
        }

        match &self.area {
            AreaOfInterest::Point { lat, lon } => {
                pairs.push(("lat", lat.to_string()));
                pairs.push(("lon", lon.to_string()));
            }
            AreaOfInterest::State { country, state } => {
                pairs.push(("aoi_country", country.clone()));
                pairs.push(("aoi_state", state.clone()));
            }
            AreaOfInterest::Country { country } => {
                pairs.push(("aoi_country", country.clone()));
            }
        }
        pairs
    }

    /// Full request URL: `<base>/predict/blooms?<params>`.
    pub fn url(&self, base: &str) -> Result<Url> {
        let endpoint = format!("{}/predict/blooms", base.trim_end_matches('/'));
        Url::parse_with_params(&endpoint, self.query_pairs())
            .map_err(|e| BloomError::InvalidInput(format!("invalid API base URL {:?}: {}", base, e)))
    }
}

fn non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BloomError::InvalidInput(format!(
            "Missing required field `{}`",
            field
        )));
    }
    Ok(())
}

/// Result of loading a prediction response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionOutcome {
    /// The predictions replaced the active dataset.
    Loaded(usize),
    /// The service had nothing for this query. The active dataset is unchanged.
    NoResults,
}
