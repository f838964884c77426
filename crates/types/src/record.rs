//! Flowering records and their composite identity.

use crate::season::Season;
use crate::timeline::TimelineStep;
use geo::{MultiPolygon, Point};
use serde::{Deserialize, Serialize};

/// One geo-tagged flowering observation or prediction.
///
/// Records carry no primary key. Two records are "the same" for filtering
/// purposes when their [`RecordKey`]s are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub family: String,
    pub genus: String,
    pub season: Season,
    pub year: i32,
    /// Cluster area in km², used for display sizing only.
    pub area: f64,
    /// Longitude/latitude of the record (polygon centroid for clustered sites).
    pub location: Point<f64>,
    /// Model confidence. Present only on predictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Site outline, when the source feature was a polygon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<MultiPolygon<f64>>,
}

impl Record {
    /// Create an observation record located at `location`.
    pub fn new(
        family: impl Into<String>,
        genus: impl Into<String>,
        year: i32,
        season: Season,
        area: f64,
        location: Point<f64>,
    ) -> Self {
        Self {
            family: family.into(),
            genus: genus.into(),
            season,
            year,
            area,
            location,
            confidence: None,
            footprint: None,
        }
    }

    /// Mark the record as a prediction with the given confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_footprint(mut self, footprint: MultiPolygon<f64>) -> Self {
        self.footprint = Some(footprint);
        self
    }

    pub fn is_prediction(&self) -> bool {
        self.confidence.is_some()
    }

    /// The timeline bucket this record belongs to.
    pub fn step(&self) -> TimelineStep {
        TimelineStep::new(self.year, self.season)
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.genus, &self.family, self.year, self.season, self.area)
    }
}

/// Composite identity `(genus, family, year, season, area)`.
///
/// Used to match records across independently computed selections, which may
/// hold different instances of the same record. Area compares by bit pattern
/// after folding `-0.0` into `0.0` and every NaN into one canonical NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub genus: String,
    pub family: String,
    pub year: i32,
    pub season: Season,
    area_bits: u64,
}

impl RecordKey {
    pub fn new(genus: &str, family: &str, year: i32, season: Season, area: f64) -> Self {
        Self {
            genus: genus.to_string(),
            family: family.to_string(),
            year,
            season,
            area_bits: canonical_bits(area),
        }
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample() -> Record {
        Record::new(
            "Apocynaceae",
            "Asclepias",
            2000,
            Season::Spring,
            12.5,
            Point::new(-99.1, 19.4),
        )
    }

    #[test]
    fn test_key_ignores_location_and_confidence() {
        let a = sample();
        let mut b = sample().with_confidence(0.8);
        b.location = Point::new(10.0, 10.0);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_key_distinguishes_delimiter_collisions() {
        // "a_b" + "c" and "a" + "b_c" would collide as joined strings.
        let a = RecordKey::new("a_b", "c", 2000, Season::Spring, 1.0);
        let b = RecordKey::new("a", "b_c", 2000, Season::Spring, 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_area_normalization() {
        let pos = RecordKey::new("g", "f", 2000, Season::Fall, 0.0);
        let neg = RecordKey::new("g", "f", 2000, Season::Fall, -0.0);
        assert_eq!(pos, neg);

        let mut set = HashSet::new();
        set.insert(RecordKey::new("g", "f", 2000, Season::Fall, f64::NAN));
        assert!(set.contains(&RecordKey::new("g", "f", 2000, Season::Fall, f64::NAN)));
    }

    #[test]
    fn test_prediction_flag() {
        assert!(!sample().is_prediction());
        assert!(sample().with_confidence(0.4).is_prediction());
        assert_eq!(sample().step(), TimelineStep::new(2000, Season::Spring));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["genus"], "Asclepias");
        assert_eq!(json["season"], "Spring");
        assert!(json.get("confidence").is_none());
    }
}
