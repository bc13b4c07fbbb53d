//! JSON ingestion for the zone data source.
//!
//! The wire format is a JSON array of records:
//!
//! ```json
//! [{
//!   "id": 1,
//!   "name": "Hangang Yeouido weir",
//!   "type": "prohibited",
//!   "region": "Seoul",
//!   "restriction": "No fishing within 100m of the weir",
//!   "coordinates": [{"lat": 37.5283, "lng": 126.9311}, ...]
//! }]
//! ```
//!
//! Exactly one of `coordinates` (ring), `rings` (multi-ring), or `path`
//! (linear feature) carries the geometry. Each record is deserialized
//! independently so a single malformed entry is dropped with a warning
//! instead of failing the whole catalog.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::record::{Geometry, GeometryError, Zone, ZoneId, ZoneKind};
use super::ZoneCatalog;
use crate::coord::LatLng;

/// Errors for a structurally unreadable data source.
///
/// Per-record problems are not errors: those records are dropped.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document itself is not a JSON array.
    #[error("zone data source is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("zone data source must be a JSON array of records")]
    NotAnArray,
}

/// Raw record as it appears on the wire, prior to validation.
#[derive(Debug, Deserialize)]
struct RawZone {
    id: u32,
    name: String,
    #[serde(rename = "type")]
    kind: ZoneKind,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    restriction: Option<String>,
    #[serde(default)]
    coordinates: Option<Vec<LatLng>>,
    #[serde(default)]
    rings: Option<Vec<Vec<LatLng>>>,
    #[serde(default)]
    path: Option<Vec<LatLng>>,
}

#[derive(Debug, Error)]
enum RecordError {
    #[error("{0}")]
    Shape(String),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("record carries no geometry field")]
    MissingGeometry,
}

pub(super) fn parse(json: &str) -> Result<ZoneCatalog, CatalogError> {
    let document: Value = serde_json::from_str(json)?;
    let records = document.as_array().ok_or(CatalogError::NotAnArray)?;

    let mut zones = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    for (index, record) in records.iter().enumerate() {
        match ingest_record(record) {
            Ok(zone) => zones.push(zone),
            Err(err) => {
                dropped += 1;
                warn!(index, error = %err, "dropping malformed zone record");
            }
        }
    }

    debug!(
        loaded = zones.len(),
        dropped, "zone catalog ingestion complete"
    );
    Ok(ZoneCatalog::from_zones(zones))
}

fn ingest_record(record: &Value) -> Result<Zone, RecordError> {
    let raw: RawZone = serde_json::from_value(record.clone())
        .map_err(|e| RecordError::Shape(e.to_string()))?;

    let geometry = match (raw.coordinates, raw.rings, raw.path) {
        (Some(ring), None, None) => Geometry::Ring(ring),
        (None, Some(rings), None) => Geometry::MultiRing(rings),
        (None, None, Some(path)) => Geometry::Path(path),
        (None, None, None) => return Err(RecordError::MissingGeometry),
        _ => {
            return Err(RecordError::Shape(
                "record carries more than one geometry field".to_string(),
            ))
        }
    };

    let zone = Zone::new(ZoneId(raw.id), raw.name, raw.kind, geometry)?
        .with_metadata(raw.region, raw.section, raw.restriction);
    Ok(zone)
}
