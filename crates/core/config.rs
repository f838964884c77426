//! Engine configuration.
//!
//! Playback timing, display sizing and colors, and where datasets and the
//! prediction service live. Every field has a default so partial JSON or TOML
//! documents load.
use serde::de::Error;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub use bloomscope_types::config::{ColorMode, DisplayMode};
pub use bloomscope_types::season::Season;
pub use bloomscope_types::timeline::TimelineStep;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Period of the playback timer in milliseconds
    #[serde(default = "Config::default_playback_interval_ms")]
    pub playback_interval_ms: u64,

    /// Step the timeline opens at after a dataset load, when present
    #[serde(default = "Config::default_start_step")]
    pub start_step: Option<TimelineStep>,

    #[serde(default)]
    pub point_style: PointStyle,

    #[serde(default = "Config::default_color")]
    pub default_color: String,

    #[serde(default = "Config::default_user_location_color")]
    pub user_location_color: String,

    /// Base URL of the prediction service
    #[serde(default = "Config::default_api_base_url")]
    pub api_base_url: String,

    /// Named datasets available for loading
    #[serde(default = "Config::default_datasets")]
    pub datasets: BTreeMap<String, PathBuf>,
}

/// Display sizing for record points.
///
/// A point's radius is `base_radius + area * area_scale`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointStyle {
    #[serde(default = "PointStyle::default_area_scale")]
    pub area_scale: f64,

    #[serde(default = "PointStyle::default_base_radius")]
    pub base_radius: f64,
}

impl PointStyle {
    const fn default_area_scale() -> f64 {
        0.000_000_5
    }

    const fn default_base_radius() -> f64 {
        0.1
    }

    /// Display radius for a record of the given area.
    pub fn radius_for(&self, area: f64) -> f64 {
        let area = if area.is_finite() { area.max(0.0) } else { 0.0 };
        self.base_radius + area * self.area_scale
    }
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            area_scale: Self::default_area_scale(),
            base_radius: Self::default_base_radius(),
        }
    }
}

impl Config {
    const fn default_playback_interval_ms() -> u64 {
        500
    }

    fn default_start_step() -> Option<TimelineStep> {
        Some(TimelineStep::new(2000, Season::Spring))
    }

    fn default_color() -> String {
        "#ff0a48ff".to_string()
    }

    fn default_user_location_color() -> String {
        "#4ed9d9".to_string()
    }

    fn default_api_base_url() -> String {
        "http://localhost:5001/api".to_string()
    }

    fn default_datasets() -> BTreeMap<String, PathBuf> {
        BTreeMap::from([(
            "flowering_sites".to_string(),
            PathBuf::from("data/geojson/flowering_sites.geojson"),
        )])
    }

    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback_interval_ms)
    }

    pub fn with_playback_interval(mut self, interval: Duration) -> Self {
        let millis = interval.as_millis().min(u64::MAX as u128) as u64;
        assert!(millis > 0, "Playback interval must be at least one millisecond");
        self.playback_interval_ms = millis;
        self
    }

    pub fn with_start_step(mut self, step: Option<TimelineStep>) -> Self {
        self.start_step = step;
        self
    }

    pub fn with_point_style(mut self, style: PointStyle) -> Self {
        self.point_style = style;
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_dataset(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.datasets.insert(name.into(), path.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.playback_interval_ms == 0 {
            return Err("Playback interval must be greater than zero".to_string());
        }

        let style = &self.point_style;
        if !style.area_scale.is_finite() || style.area_scale < 0.0 {
            return Err("Point area scale must be a finite, non-negative number".to_string());
        }
        if !style.base_radius.is_finite() || style.base_radius <= 0.0 {
            return Err("Point base radius must be a finite, positive number".to_string());
        }

        for (name, color) in [
            ("default_color", &self.default_color),
            ("user_location_color", &self.user_location_color),
        ] {
            if !is_hex_color(color) {
                return Err(format!("{} must be a #rrggbb or #rrggbbaa color, got {:?}", name, color));
            }
        }

        if self.api_base_url.trim().is_empty() {
            return Err("API base URL must not be empty".to_string());
        }

        if let Some(name) = self.datasets.keys().find(|name| name.trim().is_empty()) {
            return Err(format!("Dataset names must not be empty, got {:?}", name));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback_interval_ms: Self::default_playback_interval_ms(),
            start_step: Self::default_start_step(),
            point_style: PointStyle::default(),
            default_color: Self::default_color(),
            user_location_color: Self::default_user_location_color(),
            api_base_url: Self::default_api_base_url(),
            datasets: Self::default_datasets(),
        }
    }
}

fn is_hex_color(color: &str) -> bool {
    color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.playback_interval(), Duration::from_millis(500));
        assert_eq!(config.start_step, Some(TimelineStep::new(2000, Season::Spring)));
        assert_eq!(config.default_color, "#ff0a48ff");
        assert!(config.datasets.contains_key("flowering_sites"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_playback_interval(Duration::from_millis(250))
            .with_start_step(None)
            .with_dataset("pollinators", "data/pollinators.geojson");

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();

        assert_eq!(deserialized, config);
        assert_eq!(deserialized.playback_interval_ms, 250);
        assert!(deserialized.start_step.is_none());
    }

    #[test]
    fn test_config_partial_json() {
        let config = Config::from_json(r#"{"playback_interval_ms": 1000}"#).unwrap();
        assert_eq!(config.playback_interval_ms, 1000);
        assert_eq!(config.point_style, PointStyle::default());
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{"sync_policy": "always"}"#).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::from_json(r#"{"playback_interval_ms": 0}"#).is_err());
        assert!(Config::from_json(r##"{"default_color": "red"}"##).is_err());
        assert!(Config::from_json(r#"{"point_style": {"base_radius": -1.0}}"#).is_err());
        assert!(Config::from_json(r#"{"api_base_url": "  "}"#).is_err());
    }

    #[test]
    fn test_point_radius() {
        let style = PointStyle::default();
        assert_eq!(style.radius_for(0.0), 0.1);
        assert!((style.radius_for(200_000.0) - 0.2).abs() < 1e-12);
        assert_eq!(style.radius_for(f64::NAN), 0.1);
        assert_eq!(style.radius_for(-5.0), 0.1);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default().with_api_base_url("https://example.org/api");
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
