//! Coordinate type definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// Zoom levels supported by the map SDK.
///
/// Note the SDK convention: a *larger* level is more zoomed out.
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 14;

/// Errors that can occur when constructing coordinate values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is outside the Web Mercator range.
    #[error("Invalid latitude: {0} (must be between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),
    /// Longitude is outside the valid range.
    #[error("Invalid longitude: {0} (must be between {MIN_LNG} and {MAX_LNG})")]
    InvalidLongitude(f64),
    /// Zoom level is outside the SDK's supported range.
    #[error("Invalid zoom level: {0} (must be between {MIN_ZOOM} and {MAX_ZOOM})")]
    InvalidZoom(u8),
}

/// A geographic point in degrees.
///
/// The serialized form matches the zone data source: `{"lat": .., "lng": ..}`.
/// Values deserialized from external data should be checked with
/// [`LatLng::validate`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Create a validated point.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordError> {
        let point = Self { lat, lng };
        point.validate()?;
        Ok(point)
    }

    /// Check that both components are inside the valid ranges.
    pub fn validate(&self) -> Result<(), CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&self.lat) || !self.lat.is_finite() {
            return Err(CoordError::InvalidLatitude(self.lat));
        }
        if !(MIN_LNG..=MAX_LNG).contains(&self.lng) || !self.lng.is_finite() {
            return Err(CoordError::InvalidLongitude(self.lng));
        }
        Ok(())
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// An axis-aligned rectangle given by its south-west and north-east corners.
///
/// No antimeridian handling: the service area sits well inside one
/// hemisphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub sw: LatLng,
    pub ne: LatLng,
}

impl Bounds {
    pub fn new(sw: LatLng, ne: LatLng) -> Self {
        Self { sw, ne }
    }

    /// Point-in-rectangle test, inclusive on all edges.
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.sw.lat
            && point.lat <= self.ne.lat
            && point.lng >= self.sw.lng
            && point.lng <= self.ne.lng
    }
}

/// Snapshot of the map viewport, produced by the provider on every
/// pan/zoom settle ("idle") event. Read-only to this crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: Bounds,
    /// SDK zoom level; larger values are more zoomed out.
    pub zoom: u8,
}

impl Viewport {
    pub fn new(bounds: Bounds, zoom: u8) -> Self {
        Self { bounds, zoom }
    }
}
