//! Location source trait, watch subscription, and test fake.

use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::coord::LatLng;

/// Accuracy/timeout/max-age configuration for position queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Maximum acceptable age of a cached fix.
    pub maximum_age: Duration,
}

impl LocationOptions {
    /// Defaults for the initial one-shot query: never accept a cached fix.
    pub fn one_shot() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }

    /// Defaults for the continuous watch.
    pub fn watch() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(5),
        }
    }
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self::watch()
    }
}

/// Errors surfaced by the geolocation service.
///
/// None of these are fatal to the map: the engine falls back to the
/// default center and reports a "no live location" state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location request timed out")]
    Timeout,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// A single position report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub position: LatLng,
    /// Reported accuracy radius in meters, when the platform provides it.
    pub accuracy_m: Option<f64>,
}

impl LocationFix {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            accuracy_m: None,
        }
    }
}

/// The platform geolocation service.
pub trait LocationSource {
    /// One-shot position query.
    fn current_position(&self, options: &LocationOptions)
        -> Result<LocationFix, LocationError>;

    /// Start a continuous position subscription.
    fn watch(&self, options: &LocationOptions) -> Result<PositionWatch, LocationError>;
}

/// Handle to a running position watch.
///
/// Updates (fixes or errors) arrive on an internal channel; drain them
/// with [`try_next`]. The subscription is cancelled by [`stop`] or by
/// dropping the handle, so a disposed map view can never leak position
/// callbacks.
///
/// [`try_next`]: PositionWatch::try_next
/// [`stop`]: PositionWatch::stop
#[derive(Debug)]
pub struct PositionWatch {
    updates: mpsc::UnboundedReceiver<Result<LocationFix, LocationError>>,
    cancel: CancellationToken,
}

impl PositionWatch {
    pub fn new(
        updates: mpsc::UnboundedReceiver<Result<LocationFix, LocationError>>,
        cancel: CancellationToken,
    ) -> Self {
        Self { updates, cancel }
    }

    /// Next pending update, if any. Non-blocking.
    pub fn try_next(&mut self) -> Option<Result<LocationFix, LocationError>> {
        self.updates.try_recv().ok()
    }

    /// Wait for the next update. Returns `None` once the source is gone.
    pub async fn next(&mut self) -> Option<Result<LocationFix, LocationError>> {
        self.updates.recv().await
    }

    /// Cancel the subscription.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PositionWatch {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

type UpdateSender = mpsc::UnboundedSender<Result<LocationFix, LocationError>>;

/// Scriptable location source for tests.
#[derive(Debug, Default)]
pub struct FakeLocationSource {
    current: Mutex<Option<Result<LocationFix, LocationError>>>,
    watches: Mutex<Vec<(UpdateSender, CancellationToken)>>,
}

impl FakeLocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer to the next `current_position` calls.
    pub fn set_current(&self, result: Result<LocationFix, LocationError>) {
        *self.current.lock().expect("fake source lock poisoned") = Some(result);
    }

    /// Push an update to every live watch.
    pub fn push(&self, update: Result<LocationFix, LocationError>) {
        let watches = self.watches.lock().expect("fake source lock poisoned");
        for (tx, token) in watches.iter() {
            if !token.is_cancelled() {
                let _ = tx.send(update.clone());
            }
        }
    }

    /// Number of watches whose subscription has not been cancelled.
    pub fn active_watches(&self) -> usize {
        self.watches
            .lock()
            .expect("fake source lock poisoned")
            .iter()
            .filter(|(_, token)| !token.is_cancelled())
            .count()
    }
}

impl LocationSource for FakeLocationSource {
    fn current_position(
        &self,
        _options: &LocationOptions,
    ) -> Result<LocationFix, LocationError> {
        self.current
            .lock()
            .expect("fake source lock poisoned")
            .clone()
            .unwrap_or(Err(LocationError::Unavailable("not scripted".to_string())))
    }

    fn watch(&self, _options: &LocationOptions) -> Result<PositionWatch, LocationError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        self.watches
            .lock()
            .expect("fake source lock poisoned")
            .push((tx, token.clone()));
        Ok(PositionWatch::new(rx, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(lat: f64, lng: f64) -> LocationFix {
        LocationFix::new(LatLng::new(lat, lng).unwrap())
    }

    #[test]
    fn test_options_defaults() {
        let one_shot = LocationOptions::one_shot();
        assert!(one_shot.high_accuracy);
        assert_eq!(one_shot.maximum_age, Duration::ZERO);

        let watch = LocationOptions::watch();
        assert_eq!(watch.timeout, Duration::from_secs(10));
        assert_eq!(watch.maximum_age, Duration::from_secs(5));
    }

    #[test]
    fn test_fake_one_shot() {
        let source = FakeLocationSource::new();
        assert!(source
            .current_position(&LocationOptions::one_shot())
            .is_err());

        source.set_current(Ok(fix(37.5, 127.0)));
        let got = source
            .current_position(&LocationOptions::one_shot())
            .unwrap();
        assert_eq!(got.position.lat, 37.5);
    }

    #[test]
    fn test_watch_delivers_updates() {
        let source = FakeLocationSource::new();
        let mut watch = source.watch(&LocationOptions::watch()).unwrap();

        assert!(watch.try_next().is_none());

        source.push(Ok(fix(37.50, 127.00)));
        source.push(Err(LocationError::Timeout));

        assert_eq!(watch.try_next(), Some(Ok(fix(37.50, 127.00))));
        assert_eq!(watch.try_next(), Some(Err(LocationError::Timeout)));
        assert!(watch.try_next().is_none());
    }

    #[test]
    fn test_stop_cancels_subscription() {
        let source = FakeLocationSource::new();
        let watch = source.watch(&LocationOptions::watch()).unwrap();
        assert_eq!(source.active_watches(), 1);

        watch.stop();
        assert!(watch.is_stopped());
        assert_eq!(source.active_watches(), 0);
    }

    #[test]
    fn test_drop_cancels_subscription() {
        let source = FakeLocationSource::new();
        {
            let _watch = source.watch(&LocationOptions::watch()).unwrap();
            assert_eq!(source.active_watches(), 1);
        }
        assert_eq!(source.active_watches(), 0);
    }
}
