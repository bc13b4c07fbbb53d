//! Folds geolocation reports into a map-centering answer.

use tracing::debug;

use crate::coord::LatLng;

use super::source::{LocationError, LocationFix};

/// Country-wide fallback center used when no live location exists.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 36.5,
    lng: 127.5,
};

/// Outcome of the location permission flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// No fix or error seen yet.
    Pending,
    /// At least one fix received.
    Granted,
    /// Denied, timed out, or unavailable — "no live location".
    Denied,
}

/// Tracks the latest known user position.
#[derive(Debug)]
pub struct LocationTracker {
    status: PermissionStatus,
    last: Option<LatLng>,
    default_center: LatLng,
}

impl LocationTracker {
    pub fn new() -> Self {
        Self::with_default_center(DEFAULT_CENTER)
    }

    pub fn with_default_center(default_center: LatLng) -> Self {
        Self {
            status: PermissionStatus::Pending,
            last: None,
            default_center,
        }
    }

    pub fn record_fix(&mut self, fix: LocationFix) {
        self.last = Some(fix.position);
        self.status = PermissionStatus::Granted;
    }

    /// Geolocation failures are not fatal: the map keeps its last fix (if
    /// any) and otherwise falls back to the default center.
    pub fn record_error(&mut self, error: &LocationError) {
        debug!(%error, "geolocation error, entering no-live-location state");
        self.status = PermissionStatus::Denied;
    }

    pub fn status(&self) -> PermissionStatus {
        self.status
    }

    pub fn last_position(&self) -> Option<LatLng> {
        self.last
    }

    pub fn has_live_location(&self) -> bool {
        self.status == PermissionStatus::Granted && self.last.is_some()
    }

    /// Where the map should center: the live position, else the default.
    pub fn effective_center(&self) -> LatLng {
        self.last.unwrap_or(self.default_center)
    }
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(lat: f64, lng: f64) -> LocationFix {
        LocationFix::new(LatLng::new(lat, lng).unwrap())
    }

    #[test]
    fn test_starts_pending_with_default_center() {
        let tracker = LocationTracker::new();
        assert_eq!(tracker.status(), PermissionStatus::Pending);
        assert_eq!(tracker.effective_center(), DEFAULT_CENTER);
        assert!(!tracker.has_live_location());
    }

    #[test]
    fn test_fix_grants_and_centers() {
        let mut tracker = LocationTracker::new();
        tracker.record_fix(fix(37.5, 127.0));

        assert_eq!(tracker.status(), PermissionStatus::Granted);
        assert!(tracker.has_live_location());
        assert_eq!(
            tracker.effective_center(),
            LatLng::new(37.5, 127.0).unwrap()
        );
    }

    #[test]
    fn test_error_denies_but_keeps_last_fix() {
        let mut tracker = LocationTracker::new();
        tracker.record_fix(fix(37.5, 127.0));
        tracker.record_error(&LocationError::Timeout);

        assert_eq!(tracker.status(), PermissionStatus::Denied);
        assert!(!tracker.has_live_location());
        // Last position still anchors the map.
        assert_eq!(
            tracker.effective_center(),
            LatLng::new(37.5, 127.0).unwrap()
        );
    }

    #[test]
    fn test_denied_without_fix_falls_back_to_default() {
        let mut tracker = LocationTracker::new();
        tracker.record_error(&LocationError::PermissionDenied);
        assert_eq!(tracker.effective_center(), DEFAULT_CENTER);
    }
}
