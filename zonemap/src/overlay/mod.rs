//! Marker and popup lifecycle management.
//!
//! Four marker kinds with four distinct identity rules: the user-location
//! marker moves in place, the selection marker is replaced, the
//! saved-point set is rebuilt wholesale, and the info popup is a
//! singleton. [`content`] holds the pure visual descriptors; the
//! [`OverlayLifecycleManager`] owns the native handles.

mod content;
mod manager;

pub use content::{
    saved_point_info, saved_point_marker, selected_location_marker, user_location_marker,
    zone_info, InfoContent, MarkerShape, OverlayDescriptor, SavedPoint,
};
pub use manager::OverlayLifecycleManager;
