use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Summary of the currently visible records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibleStats {
    /// Number of visible records
    pub record_count: usize,
    /// Distinct families among them
    pub family_count: usize,
    /// Distinct genera among them
    pub genus_count: usize,
    /// Sum of record areas in km²
    pub total_area: f64,
    /// Records that carry a confidence value
    pub prediction_count: usize,
    /// Mean confidence over predictions, if any
    pub mean_confidence: Option<f64>,
    /// Records per family, largest first, ties by name
    pub per_family: Vec<(String, usize)>,
}

impl VisibleStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut stats = Self::new();
        let mut families: BTreeMap<&str, usize> = BTreeMap::new();
        let mut genera: BTreeSet<&str> = BTreeSet::new();
        let mut confidence_sum = 0.0;

        for record in records {
            stats.record_count += 1;
            stats.total_area += record.area;
            *families.entry(record.family.as_str()).or_default() += 1;
            genera.insert(record.genus.as_str());
            if let Some(confidence) = record.confidence {
                stats.prediction_count += 1;
                confidence_sum += confidence;
            }
        }

        stats.family_count = families.len();
        stats.genus_count = genera.len();
        if stats.prediction_count > 0 {
            stats.mean_confidence = Some(confidence_sum / stats.prediction_count as f64);
        }

        let mut per_family: Vec<(String, usize)> = families
            .into_iter()
            .map(|(family, count)| (family.to_string(), count))
            .collect();
        per_family.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats.per_family = per_family;

        stats
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}
