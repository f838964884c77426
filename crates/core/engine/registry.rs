//! The active record set and its derived indices.

use crate::compute::points::{DisplayPoint, Palette};
use crate::compute::validation::validate_location;
use crate::config::{Config, PointStyle};
use crate::error::{BloomError, Result};
use bloomscope_types::record::Record;
use geo::Point;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Holds the loaded records, their display points and taxonomy indices.
///
/// Records are immutable once loaded. A failed [`load`](Self::load) leaves the
/// previous dataset in place.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    records: Vec<Record>,
    points: Vec<DisplayPoint>,
    user_location: Option<DisplayPoint>,
    families: BTreeSet<String>,
    genera: BTreeSet<String>,
    genus_family: FxHashMap<String, String>,
    palette: Palette,
    style: PointStyle,
    default_color: String,
    user_location_color: String,
}

impl DatasetRegistry {
    pub fn new(config: &Config) -> Self {
        Self {
            records: Vec::new(),
            points: Vec::new(),
            user_location: None,
            families: BTreeSet::new(),
            genera: BTreeSet::new(),
            genus_family: FxHashMap::default(),
            palette: Palette::new(
                &BTreeSet::new(),
                &BTreeSet::new(),
                &config.default_color,
                &config.user_location_color,
            ),
            style: config.point_style,
            default_color: config.default_color.clone(),
            user_location_color: config.user_location_color.clone(),
        }
    }

    /// Replace the active record set.
    ///
    /// Records with a blank family or genus are dropped. Returns the number of
    /// records kept, or `InvalidDataset` when none remain.
    pub fn load(&mut self, records: Vec<Record>) -> Result<usize> {
        let total = records.len();
        let records: Vec<Record> = records
            .into_iter()
            .filter(|r| !r.family.trim().is_empty() && !r.genus.trim().is_empty())
            .collect();

        if records.is_empty() {
            return Err(BloomError::InvalidDataset(format!(
                "no usable records among {} supplied",
                total
            )));
        }
        if records.len() < total {
            log::debug!(
                "Dropped {} records missing family or genus",
                total - records.len()
            );
        }

        let mut families = BTreeSet::new();
        let mut genera = BTreeSet::new();
        let mut genus_family: FxHashMap<String, String> = FxHashMap::default();
        for record in &records {
            families.insert(record.family.clone());
            genera.insert(record.genus.clone());
            if let Some(previous) = genus_family.insert(record.genus.clone(), record.family.clone())
                && previous != record.family
            {
                log::warn!(
                    "Genus {} appears under families {} and {}; keeping {}",
                    record.genus,
                    previous,
                    record.family,
                    record.family
                );
            }
        }

        self.points = records
            .iter()
            .map(|r| DisplayPoint::from_record(r, &self.style))
            .collect();
        self.palette = Palette::new(
            &families,
            &genera,
            &self.default_color,
            &self.user_location_color,
        );
        self.records = records;
        self.families = families;
        self.genera = genera;
        self.genus_family = genus_family;

        log::info!(
            "Loaded {} records ({} families, {} genera)",
            self.records.len(),
            self.families.len(),
            self.genera.len()
        );
        Ok(self.records.len())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One display point per record, in record order.
    pub fn points(&self) -> &[DisplayPoint] {
        &self.points
    }

    pub fn user_location(&self) -> Option<&DisplayPoint> {
        self.user_location.as_ref()
    }

    /// Place or clear the user-location marker. It survives dataset reloads.
    pub fn set_user_location(&mut self, position: Option<Point<f64>>) -> Result<()> {
        self.user_location = match position {
            Some(position) => {
                validate_location(&position)?;
                Some(DisplayPoint::user_location(position, &self.style))
            }
            None => None,
        };
        Ok(())
    }

    pub fn distinct_families(&self) -> &BTreeSet<String> {
        &self.families
    }

    pub fn distinct_genera(&self) -> &BTreeSet<String> {
        &self.genera
    }

    pub fn family_of(&self, genus: &str) -> Option<&str> {
        self.genus_family.get(genus).map(String::as_str)
    }

    /// Genera mapped to `family`, sorted.
    pub fn genera_of(&self, family: &str) -> Vec<&str> {
        self.genera
            .iter()
            .filter(|genus| self.family_of(genus) == Some(family))
            .map(String::as_str)
            .collect()
    }

    /// Distinct years across the loaded records, ascending.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// True when any loaded record carries a confidence.
    pub fn is_prediction_set(&self) -> bool {
        self.records.iter().any(Record::is_prediction)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloomscope_types::season::Season;

    fn record(family: &str, genus: &str, year: i32) -> Record {
        Record::new(family, genus, year, Season::Spring, 1.0, Point::new(-99.0, 19.0))
    }

    #[test]
    fn test_load_builds_indices() {
        let mut registry = DatasetRegistry::new(&Config::default());
        let loaded = registry
            .load(vec![
                record("Apocynaceae", "Asclepias", 2001),
                record("Nymphalidae", "Danaus", 2000),
                record("Apocynaceae", "Asclepias", 2000),
                record("", "Orphan", 2000),
            ])
            .unwrap();

        assert_eq!(loaded, 3);
        assert_eq!(registry.distinct_families().len(), 2);
        assert_eq!(registry.distinct_genera().len(), 2);
        assert_eq!(registry.family_of("Danaus"), Some("Nymphalidae"));
        assert_eq!(registry.genera_of("Apocynaceae"), vec!["Asclepias"]);
        assert_eq!(registry.years().into_iter().collect::<Vec<_>>(), vec![2000, 2001]);
        assert_eq!(registry.points().len(), 3);
        assert!(!registry.is_prediction_set());
    }

    #[test]
    fn test_load_rejects_empty_and_keeps_previous() {
        let mut registry = DatasetRegistry::new(&Config::default());
        registry.load(vec![record("F", "G", 2000)]).unwrap();

        let err = registry.load(vec![record(" ", "G", 2000)]).unwrap_err();
        assert!(matches!(err, BloomError::InvalidDataset(_)));
        assert!(registry.load(Vec::new()).is_err());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.records()[0].genus, "G");
    }

    #[test]
    fn test_genus_family_last_write_wins() {
        let mut registry = DatasetRegistry::new(&Config::default());
        registry
            .load(vec![record("First", "Shared", 2000), record("Second", "Shared", 2000)])
            .unwrap();
        assert_eq!(registry.family_of("Shared"), Some("Second"));
        assert!(registry.genera_of("First").is_empty());
    }

    #[test]
    fn test_prediction_set() {
        let mut registry = DatasetRegistry::new(&Config::default());
        registry
            .load(vec![record("F", "G", 2000), record("F", "H", 2000).with_confidence(0.8)])
            .unwrap();
        assert!(registry.is_prediction_set());
    }

    #[test]
    fn test_user_location_survives_reload() {
        let mut registry = DatasetRegistry::new(&Config::default());
        registry.set_user_location(Some(Point::new(-100.0, 20.0))).unwrap();
        registry.load(vec![record("F", "G", 2000)]).unwrap();
        assert!(registry.user_location().is_some());

        assert!(registry.set_user_location(Some(Point::new(0.0, 91.0))).is_err());
        assert!(registry.user_location().is_some());

        registry.set_user_location(None).unwrap();
        assert!(registry.user_location().is_none());
    }
}
