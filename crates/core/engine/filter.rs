//! Independent filter criteria and their combination.
//!
//! Taxonomy selections use the empty set as "no restriction". The spatial and
//! area restrictions are optional record sets, matched against each other by
//! [`RecordKey`] because they may hold distinct instances of the same record.

use crate::engine::registry::DatasetRegistry;
use bloomscope_types::record::{Record, RecordKey};
use bloomscope_types::timeline::TimelineStep;
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;

/// A spatial or map-area restriction.
#[derive(Debug, Clone, Default)]
struct Restriction {
    records: Vec<Record>,
    keys: FxHashSet<RecordKey>,
}

impl Restriction {
    fn new(records: Vec<Record>) -> Self {
        let keys = records.iter().map(Record::key).collect();
        Self { records, keys }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterComposer {
    families: BTreeSet<String>,
    genera: BTreeSet<String>,
    spatial: Option<Restriction>,
    area: Option<Restriction>,
}

impl FilterComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every criterion.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn selected_families(&self) -> &BTreeSet<String> {
        &self.families
    }

    pub fn selected_genera(&self) -> &BTreeSet<String> {
        &self.genera
    }

    pub fn is_family_selected(&self, family: &str) -> bool {
        self.families.is_empty() || self.families.contains(family)
    }

    pub fn is_genus_selected(&self, genus: &str) -> bool {
        self.genera.is_empty() || self.genera.contains(genus)
    }

    /// Replace the family selection.
    ///
    /// A selection covering every distinct family collapses to "no
    /// restriction", and so does an empty one. Families that were selected
    /// before and are missing from a non-empty `families` have their genera
    /// removed from the genus selection.
    pub fn set_family_selection<I>(&mut self, registry: &DatasetRegistry, families: I)
    where
        I: IntoIterator<Item = String>,
    {
        let requested: BTreeSet<String> = families.into_iter().collect();
        let deselected: Vec<String> = if requested.is_empty() {
            Vec::new()
        } else {
            registry
                .distinct_families()
                .iter()
                .filter(|family| self.is_family_selected(family) && !requested.contains(*family))
                .cloned()
                .collect()
        };
        self.apply_family_selection(registry, requested, &deselected);
    }

    /// Replace the genus selection. Never touches the family selection.
    pub fn set_genus_selection<I>(&mut self, registry: &DatasetRegistry, genera: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.genera = normalize(genera.into_iter().collect(), registry.distinct_genera());
    }

    /// Check or uncheck one family.
    ///
    /// Unchecking the last checked family leaves no family restriction, but
    /// its genera still leave the genus selection.
    pub fn toggle_family(&mut self, registry: &DatasetRegistry, family: &str, checked: bool) {
        let deselected = if !checked && self.is_family_selected(family) {
            vec![family.to_string()]
        } else {
            Vec::new()
        };
        let next = toggled(&self.families, registry.distinct_families(), family, checked);
        self.apply_family_selection(registry, next, &deselected);
    }

    /// Check or uncheck one genus.
    pub fn toggle_genus(&mut self, registry: &DatasetRegistry, genus: &str, checked: bool) {
        let next = toggled(&self.genera, registry.distinct_genera(), genus, checked);
        self.set_genus_selection(registry, next);
    }

    fn apply_family_selection(
        &mut self,
        registry: &DatasetRegistry,
        families: BTreeSet<String>,
        deselected: &[String],
    ) {
        self.families = normalize(families, registry.distinct_families());
        if deselected.is_empty() {
            return;
        }

        // Materialize once so an intermediate empty set is not read as "all".
        let mut genera = if self.genera.is_empty() {
            registry.distinct_genera().clone()
        } else {
            std::mem::take(&mut self.genera)
        };
        for family in deselected {
            for genus in registry.genera_of(family) {
                genera.remove(genus);
            }
            log::debug!(
                "Deselected family {}; {} genera remain selected",
                family,
                genera.len()
            );
        }
        self.genera = normalize(genera, registry.distinct_genera());
    }

    pub fn set_spatial_selection(&mut self, records: Option<Vec<Record>>) {
        self.spatial = records.map(Restriction::new);
    }

    pub fn set_area_selection(&mut self, records: Option<Vec<Record>>) {
        self.area = records.map(Restriction::new);
    }

    /// Records remaining after the spatial and area restrictions, before
    /// taxonomy and time filtering.
    pub fn effective_spatial_subset<'a>(&'a self, registry: &'a DatasetRegistry) -> Vec<&'a Record> {
        match (&self.spatial, &self.area) {
            (None, None) => registry.records().iter().collect(),
            (Some(only), None) | (None, Some(only)) => only.records.iter().collect(),
            (Some(spatial), Some(area)) => area
                .records
                .iter()
                .filter(|record| spatial.keys.contains(&record.key()))
                .collect(),
        }
    }

    /// Whether a record falls in `step` and passes the taxonomy selections.
    pub fn matches(&self, record: &Record, step: &TimelineStep) -> bool {
        record.year == step.year
            && record.season == step.season
            && self.is_family_selected(&record.family)
            && self.is_genus_selected(&record.genus)
    }
}

fn normalize(selection: BTreeSet<String>, distinct: &BTreeSet<String>) -> BTreeSet<String> {
    if !distinct.is_empty() && distinct.is_subset(&selection) {
        BTreeSet::new()
    } else {
        selection
    }
}

fn toggled(
    current: &BTreeSet<String>,
    distinct: &BTreeSet<String>,
    value: &str,
    checked: bool,
) -> BTreeSet<String> {
    let mut next = if current.is_empty() {
        distinct.clone()
    } else {
        current.clone()
    };
    if checked {
        next.insert(value.to_string());
    } else {
        next.remove(value);
    }
    next
}
