//! Zone record types and geometry validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{CoordError, LatLng};

/// Unique identifier of a zone record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// Legal classification of a zone.
///
/// This is the only axis the renderer styles on; an unrecognized type tag
/// is rejected at ingestion, so style lookup stays total over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    /// Fishing prohibited outright.
    Prohibited,
    /// Fishing restricted (seasonal, gear, or species conditions).
    Restricted,
}

impl ZoneKind {
    /// Human-readable label used in popup content.
    pub fn label(&self) -> &'static str {
        match self {
            ZoneKind::Prohibited => "No fishing",
            ZoneKind::Restricted => "Restricted",
        }
    }
}

/// Zone geometry.
///
/// Validation happens in [`Zone::new`]: rings carry at least 3 points,
/// paths at least 2, and a multi-ring at least one ring.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Ordered closed sequence of points — a simple polygon.
    Ring(Vec<LatLng>),
    /// Several disjoint rings sharing one record.
    MultiRing(Vec<Vec<LatLng>>),
    /// Open ordered sequence — a linear feature such as a river segment.
    Path(Vec<LatLng>),
}

/// Why a record was rejected during ingestion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("ring has {0} points, need at least 3")]
    ShortRing(usize),
    #[error("path has {0} points, need at least 2")]
    ShortPath(usize),
    #[error("multi-ring geometry has no rings")]
    EmptyMultiRing,
    #[error(transparent)]
    Coord(#[from] CoordError),
}

/// A geofenced zone record.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub kind: ZoneKind,
    pub geometry: Geometry,
    /// Region label, e.g. a province name.
    pub region: Option<String>,
    /// Sub-section label, e.g. a river reach.
    pub section: Option<String>,
    /// Free-text restriction description.
    pub restriction: Option<String>,
}

impl Zone {
    /// Create a zone, validating its geometry.
    pub fn new(
        id: ZoneId,
        name: String,
        kind: ZoneKind,
        geometry: Geometry,
    ) -> Result<Self, GeometryError> {
        validate_geometry(&geometry)?;
        Ok(Self {
            id,
            name,
            kind,
            geometry,
            region: None,
            section: None,
            restriction: None,
        })
    }

    pub fn with_metadata(
        mut self,
        region: Option<String>,
        section: Option<String>,
        restriction: Option<String>,
    ) -> Self {
        self.region = region;
        self.section = section;
        self.restriction = restriction;
        self
    }

    /// The first coordinate of the first ring/path.
    ///
    /// Used as a cheap visibility proxy by the render scheduler. Geometry
    /// validation guarantees the point exists.
    pub fn representative_point(&self) -> LatLng {
        match &self.geometry {
            Geometry::Ring(ring) => ring[0],
            Geometry::MultiRing(rings) => rings[0][0],
            Geometry::Path(path) => path[0],
        }
    }
}

fn validate_geometry(geometry: &Geometry) -> Result<(), GeometryError> {
    match geometry {
        Geometry::Ring(ring) => validate_ring(ring),
        Geometry::MultiRing(rings) => {
            if rings.is_empty() {
                return Err(GeometryError::EmptyMultiRing);
            }
            for ring in rings {
                validate_ring(ring)?;
            }
            Ok(())
        }
        Geometry::Path(path) => {
            if path.len() < 2 {
                return Err(GeometryError::ShortPath(path.len()));
            }
            for point in path {
                point.validate()?;
            }
            Ok(())
        }
    }
}

fn validate_ring(ring: &[LatLng]) -> Result<(), GeometryError> {
    if ring.len() < 3 {
        return Err(GeometryError::ShortRing(ring.len()));
    }
    for point in ring {
        point.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    fn triangle() -> Vec<LatLng> {
        vec![p(37.52, 126.93), p(37.53, 126.94), p(37.51, 126.94)]
    }

    #[test]
    fn test_ring_zone_ok() {
        let zone = Zone::new(
            ZoneId(1),
            "weir".into(),
            ZoneKind::Prohibited,
            Geometry::Ring(triangle()),
        );
        assert!(zone.is_ok());
    }

    #[test]
    fn test_short_ring_rejected() {
        let result = Zone::new(
            ZoneId(1),
            "bad".into(),
            ZoneKind::Prohibited,
            Geometry::Ring(vec![p(37.0, 127.0), p(37.1, 127.1)]),
        );
        assert!(matches!(result, Err(GeometryError::ShortRing(2))));
    }

    #[test]
    fn test_short_path_rejected() {
        let result = Zone::new(
            ZoneId(1),
            "bad".into(),
            ZoneKind::Restricted,
            Geometry::Path(vec![p(37.0, 127.0)]),
        );
        assert!(matches!(result, Err(GeometryError::ShortPath(1))));
    }

    #[test]
    fn test_empty_multi_ring_rejected() {
        let result = Zone::new(
            ZoneId(1),
            "bad".into(),
            ZoneKind::Restricted,
            Geometry::MultiRing(vec![]),
        );
        assert!(matches!(result, Err(GeometryError::EmptyMultiRing)));
    }

    #[test]
    fn test_out_of_range_coordinate_rejected() {
        let mut ring = triangle();
        ring[1] = LatLng {
            lat: 99.0,
            lng: 127.0,
        };
        let result = Zone::new(
            ZoneId(1),
            "bad".into(),
            ZoneKind::Prohibited,
            Geometry::Ring(ring),
        );
        assert!(matches!(result, Err(GeometryError::Coord(_))));
    }

    #[test]
    fn test_representative_point() {
        let zone = Zone::new(
            ZoneId(1),
            "weir".into(),
            ZoneKind::Prohibited,
            Geometry::Ring(triangle()),
        )
        .unwrap();
        assert_eq!(zone.representative_point(), p(37.52, 126.93));

        let multi = Zone::new(
            ZoneId(2),
            "river".into(),
            ZoneKind::Restricted,
            Geometry::MultiRing(vec![triangle(), triangle()]),
        )
        .unwrap();
        assert_eq!(multi.representative_point(), p(37.52, 126.93));

        let path = Zone::new(
            ZoneId(3),
            "reach".into(),
            ZoneKind::Restricted,
            Geometry::Path(vec![p(36.3, 127.4), p(36.4, 127.5)]),
        )
        .unwrap();
        assert_eq!(path.representative_point(), p(36.3, 127.4));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ZoneKind::Prohibited.label(), "No fishing");
        assert_eq!(ZoneKind::Restricted.label(), "Restricted");
    }
}
