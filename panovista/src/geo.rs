//! Geographic primitives for area scanning.
//!
//! Provides the bounding-box type with its ordering invariants, the
//! meters-to-degrees step conversion, and the lazy raster-order sample
//! point iterator that drives an area scan.

use std::fmt;
use thiserror::Error;

/// Meters per degree of latitude (spherical approximation).
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Valid latitude range in degrees.
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees.
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

// Slack for deciding whether stepping landed on the far edge.
const EDGE_EPSILON: f64 = 1e-9;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from raw coordinates.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.8}, {:.8}", self.lat, self.lon)
    }
}

/// Errors raised when a bounding box violates its ordering invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    /// Top-left corner is not north of the bottom-right corner
    #[error(
        "invalid region: top-left latitude {top} must be north of bottom-right latitude {bottom}"
    )]
    LatitudeOrder { top: f64, bottom: f64 },

    /// Top-left corner is not west of the bottom-right corner
    #[error(
        "invalid region: top-left longitude {left} must be west of bottom-right longitude {right}"
    )]
    LongitudeOrder { left: f64, right: f64 },

    /// Latitude outside the valid range
    #[error("invalid latitude: {0} (must be between {MIN_LAT} and {MAX_LAT})")]
    LatitudeRange(f64),

    /// Longitude outside the valid range
    #[error("invalid longitude: {0} (must be between {MIN_LON} and {MAX_LON})")]
    LongitudeRange(f64),

    /// Sample step that cannot produce a finite grid of points
    #[error("invalid sample step: {0} (must be positive and finite)")]
    StepSize(f64),
}

/// A geographic scan region defined by two corners.
///
/// Invariant, enforced at construction: the top-left corner is strictly
/// north and strictly west of the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    top_left: GeoPoint,
    bottom_right: GeoPoint,
}

impl BoundingBox {
    /// Creates a bounding box, validating corner ordering and ranges.
    ///
    /// # Errors
    ///
    /// Returns a [`RegionError`] if a coordinate is out of range or the
    /// corners are not in top-left/bottom-right order.
    pub fn new(top_left: GeoPoint, bottom_right: GeoPoint) -> Result<Self, RegionError> {
        for lat in [top_left.lat, bottom_right.lat] {
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                return Err(RegionError::LatitudeRange(lat));
            }
        }
        for lon in [top_left.lon, bottom_right.lon] {
            if !(MIN_LON..=MAX_LON).contains(&lon) {
                return Err(RegionError::LongitudeRange(lon));
            }
        }
        if top_left.lat <= bottom_right.lat {
            return Err(RegionError::LatitudeOrder {
                top: top_left.lat,
                bottom: bottom_right.lat,
            });
        }
        if top_left.lon >= bottom_right.lon {
            return Err(RegionError::LongitudeOrder {
                left: top_left.lon,
                right: bottom_right.lon,
            });
        }
        Ok(Self {
            top_left,
            bottom_right,
        })
    }

    /// Northwest corner of the region.
    pub fn top_left(&self) -> GeoPoint {
        self.top_left
    }

    /// Southeast corner of the region.
    pub fn bottom_right(&self) -> GeoPoint {
        self.bottom_right
    }

    /// Latitude at the vertical center, used for step conversion.
    pub fn center_lat(&self) -> f64 {
        (self.top_left.lat + self.bottom_right.lat) / 2.0
    }

    /// Returns a lazy iterator over sample points covering the region.
    ///
    /// Points are produced in raster order: latitude steps downward
    /// from the top edge, longitude steps eastward from the left edge.
    /// Both far edges are always included, so the four corners of the
    /// box are sampled even when the span is not an exact multiple of
    /// the step.
    ///
    /// `step_meters` is converted to degrees at the region's center
    /// latitude.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::StepSize`] for a zero, negative or
    /// non-finite step: stepping with one would either never terminate
    /// or walk away from the region.
    pub fn sample_points(&self, step_meters: f64) -> Result<SamplePoints, RegionError> {
        if !(step_meters > 0.0 && step_meters.is_finite()) {
            return Err(RegionError::StepSize(step_meters));
        }
        let (lat_step, lon_step) = meters_to_degrees(step_meters, self.center_lat());

        let rows = SampleAxis::new(self.top_left.lat, self.bottom_right.lat, -lat_step);
        let cols = SampleAxis::new(self.top_left.lon, self.bottom_right.lon, lon_step);

        Ok(SamplePoints {
            rows,
            cols,
            index: 0,
        })
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] to [{}]", self.top_left, self.bottom_right)
    }
}

/// Converts a distance in meters to approximate degree steps.
///
/// One degree of latitude is roughly 111,320 m everywhere; one degree
/// of longitude shrinks with the cosine of the latitude, so the
/// longitude step widens toward the poles to keep ground distance
/// constant.
pub fn meters_to_degrees(meters: f64, latitude: f64) -> (f64, f64) {
    let lat_degrees = meters / METERS_PER_DEGREE_LAT;
    let lon_degrees = meters / (METERS_PER_DEGREE_LAT * latitude.to_radians().cos().abs());
    (lat_degrees, lon_degrees)
}

/// One axis of the sample grid: a start value, a signed step, and a
/// sample count that always includes the far edge.
#[derive(Debug, Clone, Copy)]
struct SampleAxis {
    start: f64,
    end: f64,
    step: f64,
    count: u64,
}

impl SampleAxis {
    fn new(start: f64, end: f64, step: f64) -> Self {
        let span = (end - start).abs();
        let magnitude = step.abs();
        let mut count = (span / magnitude).floor() as u64 + 1;
        // Append the far edge when stepping falls short of it.
        if (count - 1) as f64 * magnitude < span - EDGE_EPSILON {
            count += 1;
        }
        Self {
            start,
            end,
            step,
            count,
        }
    }

    fn value(&self, index: u64) -> f64 {
        if index == self.count - 1 {
            self.end
        } else {
            self.start + index as f64 * self.step
        }
    }
}

/// Lazy iterator over the sample points of a [`BoundingBox`].
///
/// Finite, raster-ordered, and cheap to abandon mid-scan: no points
/// are materialized ahead of consumption.
#[derive(Debug, Clone)]
pub struct SamplePoints {
    rows: SampleAxis,
    cols: SampleAxis,
    index: u64,
}

impl Iterator for SamplePoints {
    type Item = GeoPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.rows.count * self.cols.count {
            return None;
        }

        let row = self.index / self.cols.count;
        let col = self.index % self.cols.count;
        self.index += 1;

        Some(GeoPoint {
            lat: self.rows.value(row),
            lon: self.cols.value(col),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.rows.count * self.cols.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SamplePoints {}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_box() -> BoundingBox {
        BoundingBox::new(GeoPoint::new(52.52, 13.40), GeoPoint::new(52.51, 13.42)).unwrap()
    }

    #[test]
    fn test_valid_box() {
        let bbox = small_box();
        assert!((bbox.center_lat() - 52.515).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_latitude_rejected() {
        let result = BoundingBox::new(GeoPoint::new(52.51, 13.40), GeoPoint::new(52.52, 13.42));
        assert!(matches!(result, Err(RegionError::LatitudeOrder { .. })));
    }

    #[test]
    fn test_inverted_longitude_rejected() {
        let result = BoundingBox::new(GeoPoint::new(52.52, 13.42), GeoPoint::new(52.51, 13.40));
        assert!(matches!(result, Err(RegionError::LongitudeOrder { .. })));
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let result = BoundingBox::new(GeoPoint::new(91.0, 13.40), GeoPoint::new(52.51, 13.42));
        assert!(matches!(result, Err(RegionError::LatitudeRange(_))));
    }

    #[test]
    fn test_meters_to_degrees_at_equator() {
        let (lat_deg, lon_deg) = meters_to_degrees(111_320.0, 0.0);
        assert!((lat_deg - 1.0).abs() < 1e-9);
        assert!((lon_deg - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_longitude_step_widens_with_latitude() {
        let (lat_deg, lon_deg) = meters_to_degrees(10.0, 60.0);
        // cos(60°) = 0.5, so a 10 m step spans twice the longitude degrees
        assert!((lon_deg / lat_deg - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_points_raster_order() {
        let bbox = small_box();
        // Large step: only the corner rows/columns are sampled.
        let points: Vec<_> = bbox.sample_points(10_000.0).unwrap().collect();

        assert_eq!(points.len(), 4);
        // Raster order: top row west-to-east, then bottom row.
        assert!((points[0].lat - 52.52).abs() < 1e-9);
        assert!((points[0].lon - 13.40).abs() < 1e-9);
        assert!((points[1].lat - 52.52).abs() < 1e-9);
        assert!((points[1].lon - 13.42).abs() < 1e-9);
        assert!((points[3].lat - 52.51).abs() < 1e-9);
        assert!((points[3].lon - 13.42).abs() < 1e-9);
    }

    #[test]
    fn test_sample_points_include_far_edges() {
        let bbox = small_box();
        let points: Vec<_> = bbox.sample_points(300.0).unwrap().collect();

        let last = points.last().unwrap();
        assert!((last.lat - 52.51).abs() < 1e-9, "bottom edge sampled");
        assert!((last.lon - 13.42).abs() < 1e-9, "right edge sampled");

        // Every point stays inside the box.
        for p in &points {
            assert!(p.lat <= 52.52 + 1e-9 && p.lat >= 52.51 - 1e-9);
            assert!(p.lon >= 13.40 - 1e-9 && p.lon <= 13.42 + 1e-9);
        }
    }

    #[test]
    fn test_sample_points_lazy_and_sized() {
        let bbox = small_box();
        let mut points = bbox.sample_points(10_000.0).unwrap();
        assert_eq!(points.len(), 4);
        points.next();
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_smaller_step_samples_more_points() {
        let bbox = small_box();
        let coarse = bbox.sample_points(500.0).unwrap().count();
        let fine = bbox.sample_points(50.0).unwrap().count();
        assert!(fine > coarse);
    }

    #[test]
    fn test_zero_step_rejected() {
        let bbox = small_box();
        assert_eq!(
            bbox.sample_points(0.0).err(),
            Some(RegionError::StepSize(0.0))
        );
    }

    #[test]
    fn test_negative_step_rejected() {
        // A negative step would walk away from the box, emitting
        // points outside the requested region.
        let bbox = small_box();
        assert!(matches!(
            bbox.sample_points(-300.0),
            Err(RegionError::StepSize(_))
        ));
    }

    #[test]
    fn test_non_finite_step_rejected() {
        let bbox = small_box();
        assert!(bbox.sample_points(f64::NAN).is_err());
        assert!(bbox.sample_points(f64::INFINITY).is_err());
    }
}
