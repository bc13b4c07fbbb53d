//! In-memory map provider for tests and host prototypes.

use std::collections::HashMap;

use crate::coord::{Bounds, LatLng, Viewport};
use crate::overlay::{InfoContent, OverlayDescriptor};
use crate::style::ZoneStyle;

use super::types::{MapProvider, PrimitiveId, ProviderError};

/// What a fake primitive is, with enough state to assert on.
#[derive(Debug, Clone)]
pub enum FakePrimitive {
    Polygon {
        ring: Vec<LatLng>,
        style: ZoneStyle,
    },
    Polyline {
        path: Vec<LatLng>,
        style: ZoneStyle,
    },
    Marker {
        position: LatLng,
        descriptor: OverlayDescriptor,
    },
    Info {
        anchor: LatLng,
        content: InfoContent,
    },
}

/// Records every primitive operation instead of driving a real SDK.
///
/// The viewport is settable from tests; creation can be forced to fail for
/// error-isolation tests.
#[derive(Debug)]
pub struct FakeMapProvider {
    viewport: Viewport,
    next_id: u64,
    primitives: HashMap<PrimitiveId, FakePrimitive>,
    created_total: usize,
    removed_total: usize,
    fail_next_creates: usize,
    fail_countdown: Option<usize>,
    center: Option<LatLng>,
}

impl FakeMapProvider {
    /// A provider looking at the whole Korean peninsula at zoom 7.
    pub fn new() -> Self {
        let bounds = Bounds::new(
            LatLng { lat: 33.0, lng: 124.5 },
            LatLng { lat: 38.5, lng: 131.5 },
        );
        Self::with_viewport(Viewport::new(bounds, 7))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            next_id: 1,
            primitives: HashMap::new(),
            created_total: 0,
            removed_total: 0,
            fail_next_creates: 0,
            fail_countdown: None,
            center: None,
        }
    }

    /// Simulate a pan/zoom: subsequent `viewport()` calls see this.
    pub fn set_viewport(&mut self, bounds: Bounds, zoom: u8) {
        self.viewport = Viewport::new(bounds, zoom);
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.viewport.zoom = zoom;
    }

    /// Make the next `n` create calls fail.
    pub fn fail_next_creates(&mut self, n: usize) {
        self.fail_next_creates = n;
    }

    /// Make the `n`th create call from now fail (1-based), once.
    pub fn fail_nth_create(&mut self, n: usize) {
        self.fail_countdown = Some(n);
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn created_total(&self) -> usize {
        self.created_total
    }

    pub fn removed_total(&self) -> usize {
        self.removed_total
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.primitives.contains_key(&id)
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&FakePrimitive> {
        self.primitives.get(&id)
    }

    pub fn style_of(&self, id: PrimitiveId) -> Option<&ZoneStyle> {
        match self.primitives.get(&id)? {
            FakePrimitive::Polygon { style, .. } | FakePrimitive::Polyline { style, .. } => {
                Some(style)
            }
            _ => None,
        }
    }

    pub fn marker_position(&self, id: PrimitiveId) -> Option<LatLng> {
        match self.primitives.get(&id)? {
            FakePrimitive::Marker { position, .. } => Some(*position),
            FakePrimitive::Info { anchor, .. } => Some(*anchor),
            _ => None,
        }
    }

    pub fn info_overlays(&self) -> Vec<(PrimitiveId, &InfoContent)> {
        self.primitives
            .iter()
            .filter_map(|(id, p)| match p {
                FakePrimitive::Info { content, .. } => Some((*id, content)),
                _ => None,
            })
            .collect()
    }

    pub fn last_center(&self) -> Option<LatLng> {
        self.center
    }

    fn create(&mut self, kind: &'static str, primitive: FakePrimitive) -> Result<PrimitiveId, ProviderError> {
        if self.fail_next_creates > 0 {
            self.fail_next_creates -= 1;
            return Err(ProviderError::CreateFailed {
                kind,
                reason: "forced failure".to_string(),
            });
        }
        if let Some(countdown) = self.fail_countdown {
            if countdown <= 1 {
                self.fail_countdown = None;
                return Err(ProviderError::CreateFailed {
                    kind,
                    reason: "forced failure".to_string(),
                });
            }
            self.fail_countdown = Some(countdown - 1);
        }
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        self.primitives.insert(id, primitive);
        self.created_total += 1;
        Ok(id)
    }
}

impl Default for FakeMapProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MapProvider for FakeMapProvider {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn add_polygon(
        &mut self,
        ring: &[LatLng],
        style: &ZoneStyle,
    ) -> Result<PrimitiveId, ProviderError> {
        self.create(
            "polygon",
            FakePrimitive::Polygon {
                ring: ring.to_vec(),
                style: *style,
            },
        )
    }

    fn add_polyline(
        &mut self,
        path: &[LatLng],
        style: &ZoneStyle,
    ) -> Result<PrimitiveId, ProviderError> {
        self.create(
            "polyline",
            FakePrimitive::Polyline {
                path: path.to_vec(),
                style: *style,
            },
        )
    }

    fn add_marker(
        &mut self,
        position: LatLng,
        descriptor: &OverlayDescriptor,
    ) -> Result<PrimitiveId, ProviderError> {
        self.create(
            "marker",
            FakePrimitive::Marker {
                position,
                descriptor: descriptor.clone(),
            },
        )
    }

    fn add_info(
        &mut self,
        anchor: LatLng,
        content: &InfoContent,
    ) -> Result<PrimitiveId, ProviderError> {
        self.create(
            "info overlay",
            FakePrimitive::Info {
                anchor,
                content: content.clone(),
            },
        )
    }

    fn move_marker(&mut self, id: PrimitiveId, position: LatLng) -> Result<(), ProviderError> {
        match self.primitives.get_mut(&id) {
            Some(FakePrimitive::Marker { position: p, .. }) => {
                *p = position;
                Ok(())
            }
            _ => Err(ProviderError::UnknownPrimitive(id)),
        }
    }

    fn set_style(&mut self, id: PrimitiveId, style: &ZoneStyle) -> Result<(), ProviderError> {
        match self.primitives.get_mut(&id) {
            Some(FakePrimitive::Polygon { style: s, .. })
            | Some(FakePrimitive::Polyline { style: s, .. }) => {
                *s = *style;
                Ok(())
            }
            _ => Err(ProviderError::UnknownPrimitive(id)),
        }
    }

    fn remove(&mut self, id: PrimitiveId) {
        if self.primitives.remove(&id).is_some() {
            self.removed_total += 1;
        }
    }

    fn set_center(&mut self, position: LatLng) {
        self.center = Some(position);
    }
}
