//! Spatial selections over records.
//!
//! These produce the record sets handed to the filter composer as the
//! spatial (user-drawn region or radius) and map-area restrictions.

use crate::compute::validation::{validate_area, validate_location, validate_polygon, validate_radius};
use crate::error::Result;
use bloomscope_types::bbox::MapArea;
use bloomscope_types::record::Record;
use geo::{Contains, Distance, Haversine, Intersects, Point, Polygon};

/// Records whose location lies within `radius_m` meters of `center`.
///
/// # Examples
///
/// ```
/// use bloomscope::compute::spatial::select_within_radius;
/// use bloomscope_types::{Record, Season};
/// use geo::Point;
///
/// let records = vec![
///     Record::new("Apocynaceae", "Asclepias", 2000, Season::Spring, 1.0, Point::new(-99.13, 19.43)),
///     Record::new("Rosaceae", "Prunus", 2000, Season::Spring, 1.0, Point::new(-74.0, 40.7)),
/// ];
/// let near = select_within_radius(&records, &Point::new(-99.1, 19.4), 50_000.0)?;
/// assert_eq!(near.len(), 1);
/// # Ok::<(), bloomscope::BloomError>(())
/// ```
pub fn select_within_radius(
    records: &[Record],
    center: &Point<f64>,
    radius_m: f64,
) -> Result<Vec<Record>> {
    validate_location(center)?;
    validate_radius(radius_m)?;

    Ok(records
        .iter()
        .filter(|record| Haversine.distance(*center, record.location) <= radius_m)
        .cloned()
        .collect())
}

/// Records inside a user-drawn region.
///
/// A record with a footprint is selected when the footprint touches the
/// region; otherwise its location must lie inside the region.
pub fn select_within_polygon(records: &[Record], region: &Polygon<f64>) -> Result<Vec<Record>> {
    validate_polygon(region)?;

    Ok(records
        .iter()
        .filter(|record| match &record.footprint {
            Some(footprint) => region.intersects(footprint),
            None => region.contains(&record.location),
        })
        .cloned()
        .collect())
}

/// Records located inside a map area.
pub fn select_within_area(records: &[Record], area: &MapArea) -> Result<Vec<Record>> {
    validate_area(area)?;

    Ok(records
        .iter()
        .filter(|record| area.contains(&record.location))
        .cloned()
        .collect())
}
