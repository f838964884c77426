//! Validation for locations, confidences and selection inputs.

use crate::error::{BloomError, Result};
use bloomscope_types::bbox::MapArea;
use geo::{Point, Polygon};

/// Validates a point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use bloomscope::compute::validation::validate_location;
/// use geo::Point;
///
/// assert!(validate_location(&Point::new(-99.13, 19.43)).is_ok());
/// assert!(validate_location(&Point::new(200.0, 40.0)).is_err());
/// assert!(validate_location(&Point::new(-74.0, 95.0)).is_err());
/// ```
pub fn validate_location(point: &Point<f64>) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(BloomError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(BloomError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(BloomError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(BloomError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a prediction confidence lies in [0, 1].
pub fn validate_confidence(confidence: f64) -> Result<()> {
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(BloomError::InvalidInput(format!(
            "Confidence must be within [0.0, 1.0], got: {}",
            confidence
        )));
    }
    Ok(())
}

/// Validates a required text field is present and non-blank, returning it trimmed.
pub fn require_text<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(BloomError::InvalidInput(format!("Missing required field `{}`", field))),
    }
}

/// Validates all polygon coordinates (exterior and interior rings).
pub fn validate_polygon(polygon: &Polygon<f64>) -> Result<()> {
    for (idx, coord) in polygon.exterior().coords().enumerate() {
        validate_location(&Point::from(*coord)).map_err(|e| {
            BloomError::InvalidInput(format!("Exterior ring point at index {}: {}", idx, e))
        })?;
    }

    for (ring_idx, interior) in polygon.interiors().iter().enumerate() {
        for (idx, coord) in interior.coords().enumerate() {
            validate_location(&Point::from(*coord)).map_err(|e| {
                BloomError::InvalidInput(format!(
                    "Interior ring {} point at index {}: {}",
                    ring_idx, idx, e
                ))
            })?;
        }
    }

    Ok(())
}

/// Validates a radius for spatial selections.
///
/// Ensures radius is positive, finite, and not exceeding Earth's circumference.
///
/// # Examples
///
/// ```
/// use bloomscope::compute::validation::validate_radius;
///
/// assert!(validate_radius(1000.0).is_ok());
/// assert!(validate_radius(0.0).is_err());
/// assert!(validate_radius(f64::NAN).is_err());
/// ```
pub fn validate_radius(radius: f64) -> Result<()> {
    if !radius.is_finite() {
        return Err(BloomError::InvalidInput(format!(
            "Radius must be finite, got: {}",
            radius
        )));
    }
    if radius <= 0.0 {
        return Err(BloomError::InvalidInput(format!(
            "Radius must be positive, got: {}",
            radius
        )));
    }
    const EARTH_CIRCUMFERENCE: f64 = 40_075_000.0; // meters
    if radius > EARTH_CIRCUMFERENCE {
        return Err(BloomError::InvalidInput(format!(
            "Radius {} exceeds Earth's circumference ({} meters)",
            radius, EARTH_CIRCUMFERENCE
        )));
    }
    Ok(())
}

/// Validates a map area's edges and that it has a non-zero height and width.
///
/// Edge order is not checked: [`MapArea::new`] orders latitudes and reads
/// west > east as an antimeridian crossing.
pub fn validate_area(area: &MapArea) -> Result<()> {
    validate_location(&Point::new(area.west(), area.south()))?;
    validate_location(&Point::new(area.east(), area.north()))?;

    if area.south() == area.north() {
        return Err(BloomError::InvalidInput(format!(
            "Map area has zero height at latitude {}",
            area.south()
        )));
    }
    if area.west() == area.east() {
        return Err(BloomError::InvalidInput(format!(
            "Map area has zero width at longitude {}",
            area.west()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_valid_locations() {
        assert!(validate_location(&Point::new(0.0, 0.0)).is_ok());
        assert!(validate_location(&Point::new(180.0, 90.0)).is_ok());
        assert!(validate_location(&Point::new(-180.0, -90.0)).is_ok());
    }

    #[test]
    fn test_invalid_locations() {
        assert!(validate_location(&Point::new(180.1, 0.0)).is_err());
        assert!(validate_location(&Point::new(0.0, -90.1)).is_err());
        assert!(validate_location(&Point::new(f64::NAN, 0.0)).is_err());
        assert!(validate_location(&Point::new(0.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_confidence_bounds() {
        assert!(validate_confidence(0.0).is_ok());
        assert!(validate_confidence(1.0).is_ok());
        assert!(validate_confidence(1.01).is_err());
        assert!(validate_confidence(-0.1).is_err());
        assert!(validate_confidence(f64::NAN).is_err());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("Genus", Some(" Salvia ")).unwrap(), "Salvia");
        assert!(require_text("Genus", Some("   ")).is_err());
        let err = require_text("Family", None).unwrap_err();
        assert!(err.to_string().contains("Family"));
    }

    #[test]
    fn test_validate_polygon() {
        let valid = polygon![
            (x: -100.0, y: 19.0),
            (x: -99.0, y: 19.0),
            (x: -99.0, y: 20.0),
            (x: -100.0, y: 19.0),
        ];
        assert!(validate_polygon(&valid).is_ok());

        let invalid = polygon![
            (x: -100.0, y: 19.0),
            (x: -99.0, y: 95.0),
            (x: -99.0, y: 20.0),
            (x: -100.0, y: 19.0),
        ];
        let err = validate_polygon(&invalid).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_validate_area() {
        assert!(validate_area(&MapArea::new(-10.0, -10.0, 10.0, 10.0)).is_ok());
        assert!(validate_area(&MapArea::new(170.0, -10.0, -170.0, 10.0)).is_ok());
        assert!(validate_area(&MapArea::new(-10.0, 10.0, 10.0, -10.0)).is_ok());
        assert!(validate_area(&MapArea::new(-200.0, -10.0, 10.0, 10.0)).is_err());

        let flat = validate_area(&MapArea::new(-10.0, 5.0, 10.0, 5.0)).unwrap_err();
        assert!(flat.to_string().contains("zero height"));
        let thin = validate_area(&MapArea::new(3.0, -5.0, 3.0, 5.0)).unwrap_err();
        assert!(thin.to_string().contains("zero width"));
    }
}
