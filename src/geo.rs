//! Geometry helpers for a single metropolitan area.
//!
//! Distances are great-circle distances from `geo`'s haversine metric.
//! Segment tests (river crossings, bridge snapping) run on `geo` lines in
//! longitude/latitude space, with longitude shrunk by the cosine of the
//! latitude where a planar closest point is needed.

use ::geo::algorithm::line_intersection::line_intersection;
use ::geo::{coord, Closest, ClosestPoint, Distance, Haversine, Line, Point};

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both coordinates are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        Haversine.distance(self.to_point(), other.to_point())
    }

    /// Arithmetic midpoint (adequate for short segments).
    pub fn midpoint(&self, other: &GeoPoint) -> GeoPoint {
        GeoPoint::new(0.5 * (self.lat + other.lat), 0.5 * (self.lon + other.lon))
    }

    /// `geo` point with `x = lon`, `y = lat`.
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(p: Point<f64>) -> Self {
        GeoPoint::new(p.y(), p.x())
    }
}

/// Haversine distance in metres.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    Haversine.distance(Point::new(lon1, lat1), Point::new(lon2, lat2))
}

/// Minimum distance in metres between `p` and the segment `a`–`b`.
pub fn point_to_segment_distance_m(p: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> f64 {
    if a == b {
        return p.distance_m(a);
    }

    let scale = (0.5 * (a.lat + b.lat)).to_radians().cos().abs().max(1e-6);
    let squash = |g: &GeoPoint| coord! { x: g.lon * scale, y: g.lat };
    let line = Line::new(squash(a), squash(b));

    match line.closest_point(&Point::from(squash(p))) {
        Closest::Intersection(c) | Closest::SinglePoint(c) => {
            p.distance_m(&GeoPoint::new(c.y(), c.x() / scale))
        }
        Closest::Indeterminate => p.distance_m(a).min(p.distance_m(b)),
    }
}

/// True when segments `a1`–`a2` and `b1`–`b2` properly intersect or touch.
pub fn segments_intersect(a1: &GeoPoint, a2: &GeoPoint, b1: &GeoPoint, b2: &GeoPoint) -> bool {
    let line = |p: &GeoPoint, q: &GeoPoint| Line::new(p.to_point().0, q.to_point().0);
    line_intersection(line(a1, a2), line(b1, b2)).is_some()
}
