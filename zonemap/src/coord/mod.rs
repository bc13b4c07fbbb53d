//! Geographic coordinate primitives.
//!
//! Everything the engine says about position is expressed in these types:
//! [`LatLng`] points, [`Bounds`] rectangles, and the [`Viewport`] snapshot
//! the map provider reports on every pan/zoom settle.

mod types;

pub use types::{
    Bounds, CoordError, LatLng, Viewport, MAX_LAT, MAX_LNG, MAX_ZOOM, MIN_LAT, MIN_LNG, MIN_ZOOM,
};
