//! Geolocation contract and live-position tracking.
//!
//! The platform geolocation service is consumed through the
//! [`LocationSource`] trait: a one-shot position query plus a continuous
//! watch subscription that must be cancelled when the map view is torn
//! down. [`LocationTracker`] folds fixes and errors into a "live location
//! or default center" answer for the engine.

mod source;
mod tracker;

pub use source::{
    FakeLocationSource, LocationError, LocationFix, LocationOptions, LocationSource,
    PositionWatch,
};
pub use tracker::{LocationTracker, PermissionStatus, DEFAULT_CENTER};
