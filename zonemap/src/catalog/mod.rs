//! Zone catalog — the static list of geofenced fishing zones.
//!
//! Records are loaded once at initialization, either from the bundled data
//! file or from a remote endpoint returning the same JSON structure.
//! Malformed records are dropped during ingestion with a warning; they
//! never reach the renderer. An empty or partial catalog is "zero zones",
//! not a fatal condition for the map.

mod loader;
mod record;

pub use loader::CatalogError;
pub use record::{Geometry, GeometryError, Zone, ZoneId, ZoneKind};

/// The list of geofenced zone records.
///
/// No filtering, ordering, or paging; callers filter.
#[derive(Debug, Clone, Default)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
}

impl ZoneCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-validated zones.
    pub fn from_zones(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// Parse a catalog from the JSON record sequence of the zone data
    /// source. Invalid records are dropped and logged, valid ones kept.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        loader::parse(json)
    }

    /// All zones, in ingestion order.
    pub fn list(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Look up a zone by id.
    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }
}
