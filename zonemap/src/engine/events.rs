//! Host-facing engine events.

use crate::catalog::ZoneId;
use crate::coord::LatLng;

/// What the engine reports upward to the hosting page.
///
/// Delivered on a `tokio` broadcast channel; the host subscribes via
/// [`MapEngine::subscribe`](super::MapEngine::subscribe). Missing
/// subscribers are fine — events are informational.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The SDK finished loading and the map surface is usable.
    Ready,
    /// The SDK script failed to load. Fatal for the map surface; the host
    /// shows an error state. No automatic retry.
    LoadFailed { reason: String },
    /// A rendered zone was clicked (for host-side reporting/navigation).
    ZoneClicked { zone: ZoneId, at: LatLng },
    /// Selection mode was confirmed with this coordinate.
    CoordinateChosen(LatLng),
    /// Selection mode was requested without a signed-in user.
    SignInRequired,
}
