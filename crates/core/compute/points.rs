//! Display points and color assignment.

use crate::config::{ColorMode, PointStyle};
use bloomscope_types::record::{Record, RecordKey};
use geo::{MultiPolygon, Point};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// What a display point stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum PointKind {
    /// A dataset record, identified by its composite key.
    Record {
        key: RecordKey,
        confidence: Option<f64>,
    },
    /// The viewer's own location. Never filtered out.
    UserLocation,
}

/// A renderable point derived from a record or the user's location.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPoint {
    pub kind: PointKind,
    pub position: Point<f64>,
    pub radius: f64,
    pub footprint: Option<MultiPolygon<f64>>,
}

impl DisplayPoint {
    pub fn from_record(record: &Record, style: &PointStyle) -> Self {
        Self {
            kind: PointKind::Record {
                key: record.key(),
                confidence: record.confidence,
            },
            position: record.location,
            radius: style.radius_for(record.area),
            footprint: record.footprint.clone(),
        }
    }

    pub fn user_location(position: Point<f64>, style: &PointStyle) -> Self {
        Self {
            kind: PointKind::UserLocation,
            position,
            radius: style.base_radius,
            footprint: None,
        }
    }

    pub fn key(&self) -> Option<&RecordKey> {
        match &self.kind {
            PointKind::Record { key, .. } => Some(key),
            PointKind::UserLocation => None,
        }
    }

    pub fn is_user_location(&self) -> bool {
        matches!(self.kind, PointKind::UserLocation)
    }
}

/// Colors used for families and genera, cycled in sorted-name order.
const PALETTE: [&str; 12] = [
    "#e6194bff", "#3cb44bff", "#ffe119ff", "#4363d8ff", "#f58231ff", "#911eb4ff",
    "#46f0f0ff", "#f032e6ff", "#bcf60cff", "#fabebeff", "#008080ff", "#e6beffff",
];

/// Stable color assignment for the loaded dataset.
///
/// Families and genera are colored by their position in sorted order, so the
/// same dataset always yields the same colors.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    families: FxHashMap<String, &'static str>,
    genera: FxHashMap<String, &'static str>,
    default_color: String,
    user_location_color: String,
}

impl Palette {
    pub fn new(
        families: &BTreeSet<String>,
        genera: &BTreeSet<String>,
        default_color: &str,
        user_location_color: &str,
    ) -> Self {
        Self {
            families: assign(families),
            genera: assign(genera),
            default_color: default_color.to_string(),
            user_location_color: user_location_color.to_string(),
        }
    }

    /// Color for a point under the given mode.
    pub fn color_for(&self, point: &DisplayPoint, mode: ColorMode) -> &str {
        let key = match &point.kind {
            PointKind::UserLocation => return &self.user_location_color,
            PointKind::Record { key, .. } => key,
        };
        let assigned: Option<&str> = match mode {
            ColorMode::Default => None,
            ColorMode::Family => self.families.get(&key.family).copied(),
            ColorMode::Genus => self.genera.get(&key.genus).copied(),
        };
        assigned.unwrap_or(self.default_color.as_str())
    }

    pub fn family_color(&self, family: &str) -> Option<&'static str> {
        self.families.get(family).copied()
    }
}

fn assign(names: &BTreeSet<String>) -> FxHashMap<String, &'static str> {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), PALETTE[idx % PALETTE.len()]))
        .collect()
}
