use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A rectangular map area in longitude/latitude degrees.
///
/// Wraps a `geo::Rect`. Areas whose west edge lies east of their east edge
/// wrap across the antimeridian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapArea {
    /// The underlying rectangle
    pub rect: Rect,
    /// True when the area crosses the antimeridian.
    #[serde(default)]
    pub wraps: bool,
}

impl MapArea {
    /// Create a map area from its edges.
    ///
    /// Inverted latitudes are accepted; the underlying `Rect` orders them.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscope_types::bbox::MapArea;
    /// use geo::Point;
    ///
    /// let mexico = MapArea::new(-118.4, 14.5, -86.7, 32.7);
    /// assert!(mexico.contains(&Point::new(-99.13, 19.43)));
    /// ```
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        let wraps = west > east;
        // Rect normalizes corners, so a wrapping area stores east as min x.
        Self {
            rect: Rect::new(geo::coord! { x: west, y: south }, geo::coord! { x: east, y: north }),
            wraps,
        }
    }

    pub fn west(&self) -> f64 {
        if self.wraps {
            self.rect.max().x
        } else {
            self.rect.min().x
        }
    }

    pub fn east(&self) -> f64 {
        if self.wraps {
            self.rect.min().x
        } else {
            self.rect.max().x
        }
    }

    pub fn south(&self) -> f64 {
        self.rect.min().y
    }

    pub fn north(&self) -> f64 {
        self.rect.max().y
    }

    /// Check whether a point lies inside the area (edges inclusive).
    pub fn contains(&self, point: &Point<f64>) -> bool {
        let (x, y) = (point.x(), point.y());
        if !(self.south()..=self.north()).contains(&y) {
            return false;
        }
        if self.wraps {
            x >= self.west() || x <= self.east()
        } else {
            (self.west()..=self.east()).contains(&x)
        }
    }

    /// Grow the area by `amount` degrees on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.west() - amount,
            self.south() - amount,
            self.east() + amount,
            self.north() + amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_edges() {
        let area = MapArea::new(-10.0, -5.0, 10.0, 5.0);
        assert_eq!(area.west(), -10.0);
        assert_eq!(area.east(), 10.0);
        assert_eq!(area.south(), -5.0);
        assert_eq!(area.north(), 5.0);
        assert!(!area.wraps);
    }

    #[test]
    fn test_area_contains_inclusive() {
        let area = MapArea::new(-10.0, -5.0, 10.0, 5.0);
        assert!(area.contains(&Point::new(0.0, 0.0)));
        assert!(area.contains(&Point::new(10.0, 5.0)));
        assert!(!area.contains(&Point::new(10.1, 0.0)));
        assert!(!area.contains(&Point::new(0.0, -5.1)));
    }

    #[test]
    fn test_area_swapped_latitudes() {
        let area = MapArea::new(0.0, 10.0, 5.0, -10.0);
        assert_eq!(area.south(), -10.0);
        assert!(area.contains(&Point::new(1.0, 0.0)));
    }

    #[test]
    fn test_area_wraps_antimeridian() {
        let pacific = MapArea::new(170.0, -20.0, -170.0, 20.0);
        assert!(pacific.wraps);
        assert_eq!(pacific.west(), 170.0);
        assert_eq!(pacific.east(), -170.0);
        assert!(pacific.contains(&Point::new(175.0, 0.0)));
        assert!(pacific.contains(&Point::new(-175.0, 0.0)));
        assert!(!pacific.contains(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_area_expand() {
        let area = MapArea::new(-1.0, -1.0, 1.0, 1.0).expand(0.5);
        assert_eq!(area.west(), -1.5);
        assert_eq!(area.north(), 1.5);
    }
}
