//! Provider trait and primitive handle types.

use thiserror::Error;

use crate::coord::{LatLng, Viewport};
use crate::overlay::{InfoContent, OverlayDescriptor};
use crate::style::ZoneStyle;

/// Opaque handle to a native primitive created by the provider.
///
/// Handles are owned exclusively by the engine instance that created them;
/// no other component holds references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveId(pub u64);

impl std::fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "prim#{}", self.0)
    }
}

/// Errors from native primitive operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The SDK refused to create a primitive.
    #[error("failed to create {kind}: {reason}")]
    CreateFailed {
        kind: &'static str,
        reason: String,
    },
    /// Operation referenced a handle the provider does not know.
    #[error("unknown primitive {0}")]
    UnknownPrimitive(PrimitiveId),
}

/// The map SDK surface consumed by the engine.
///
/// One implementation wraps the real SDK on the host side; tests use
/// [`super::FakeMapProvider`]. All methods are synchronous: the SDK's own
/// async load is modeled separately by [`super::SdkLoader`], and the
/// engine never touches a provider before that reports ready.
pub trait MapProvider {
    /// Current bounds-and-zoom snapshot.
    fn viewport(&self) -> Viewport;

    /// Create a polygon from a closed ring, styled for a zone kind.
    fn add_polygon(
        &mut self,
        ring: &[LatLng],
        style: &ZoneStyle,
    ) -> Result<PrimitiveId, ProviderError>;

    /// Create a polyline from an open path. Only the stroke half of the
    /// style applies.
    fn add_polyline(
        &mut self,
        path: &[LatLng],
        style: &ZoneStyle,
    ) -> Result<PrimitiveId, ProviderError>;

    /// Create a marker overlay at a position.
    fn add_marker(
        &mut self,
        position: LatLng,
        descriptor: &OverlayDescriptor,
    ) -> Result<PrimitiveId, ProviderError>;

    /// Create an info popup anchored at a coordinate.
    fn add_info(
        &mut self,
        anchor: LatLng,
        content: &InfoContent,
    ) -> Result<PrimitiveId, ProviderError>;

    /// Move a marker overlay in place.
    fn move_marker(&mut self, id: PrimitiveId, position: LatLng) -> Result<(), ProviderError>;

    /// Restyle an existing polygon/polyline.
    fn set_style(&mut self, id: PrimitiveId, style: &ZoneStyle) -> Result<(), ProviderError>;

    /// Destroy a primitive. Unknown handles are a no-op: removal is how
    /// teardown paths converge and must never fail.
    fn remove(&mut self, id: PrimitiveId);

    /// Re-center the map.
    fn set_center(&mut self, position: LatLng);
}
