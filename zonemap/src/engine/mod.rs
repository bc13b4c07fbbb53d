//! Map engine facade.
//!
//! [`MapEngine`] wires the subsystems together and owns every piece of map
//! state: the provider adapter, the SDK load lifecycle, the zone catalog
//! and render scheduler, the overlay lifecycle manager, the selection-mode
//! controller, and live-location tracking. The hosting page drives it by
//! routing SDK and UI callbacks into the methods here and listening on the
//! broadcast event channel for what to surface.
//!
//! Every method that touches the map is gated on the SDK being ready;
//! calls arriving earlier are dropped with a debug log rather than queued,
//! matching the "no map before the script loads" contract.

mod config;
mod events;

pub use config::EngineConfig;
pub use events::EngineEvent;

use std::time::Instant;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::catalog::{ZoneCatalog, ZoneId};
use crate::coord::LatLng;
use crate::location::{
    LocationError, LocationFix, LocationSource, LocationTracker, PositionWatch,
};
use crate::overlay::{self, OverlayLifecycleManager, SavedPoint};
use crate::provider::{MapProvider, PrimitiveId, SdkError, SdkLoader};
use crate::render::ViewportRenderScheduler;
use crate::selection::{SelectionError, SelectionModeController};

/// The zone-map engine.
///
/// Generic over the provider so tests run against
/// [`FakeMapProvider`](crate::provider::FakeMapProvider) and the host
/// supplies its real SDK adapter.
pub struct MapEngine<P: MapProvider> {
    config: EngineConfig,
    provider: P,
    sdk: SdkLoader,
    catalog: ZoneCatalog,
    scheduler: ViewportRenderScheduler,
    overlays: OverlayLifecycleManager,
    selection: SelectionModeController,
    location: LocationTracker,
    watch: Option<PositionWatch>,
    saved_points: Vec<SavedPoint>,
    events: broadcast::Sender<EngineEvent>,
}

impl<P: MapProvider> MapEngine<P> {
    pub fn new(provider: P, catalog: ZoneCatalog, config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        let scheduler = ViewportRenderScheduler::new(config.scheduler.clone());
        let location = LocationTracker::with_default_center(config.default_center);
        Self {
            config,
            provider,
            sdk: SdkLoader::new(),
            catalog,
            scheduler,
            overlays: OverlayLifecycleManager::new(),
            selection: SelectionModeController::new(),
            location,
            watch: None,
            saved_points: Vec::new(),
            events,
        }
    }

    /// Subscribe to engine events. Any number of subscribers; events sent
    /// with no subscribers are discarded.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: EngineEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    /// True once the SDK load completed and map calls are permitted.
    pub fn is_ready(&self) -> bool {
        self.sdk.is_ready()
    }

    fn gate(&self, op: &'static str) -> bool {
        if self.sdk.is_ready() {
            return true;
        }
        debug!(op, state = ?self.sdk.state(), "dropped map operation before SDK ready");
        false
    }

    // ------------------------------------------------------------------
    // SDK load lifecycle
    // ------------------------------------------------------------------

    /// Record that the host started the SDK script fetch.
    pub fn begin_sdk_load(&mut self) -> Result<(), SdkError> {
        self.sdk.begin()
    }

    /// The SDK script's success callback.
    ///
    /// Centers the map (live location if one already arrived, default
    /// center otherwise), draws any saved points handed over before the
    /// load finished, runs the first scheduling pass, and emits
    /// [`EngineEvent::Ready`].
    pub fn sdk_loaded(&mut self) -> Result<(), SdkError> {
        self.sdk.loaded()?;

        let center = self.location.effective_center();
        self.provider.set_center(center);
        if let Some(position) = self.location.last_position() {
            if let Err(err) = self.overlays.update_user_location(&mut self.provider, position)
            {
                warn!(error = %err, "failed to create user-location marker");
            }
        }
        if !self.saved_points.is_empty() {
            self.overlays
                .sync_saved_points(&mut self.provider, &self.saved_points);
        }
        self.scheduler
            .on_viewport_settled(&mut self.provider, &self.catalog);

        info!(%center, zones = self.catalog.len(), "map engine ready");
        self.emit(EngineEvent::Ready);
        Ok(())
    }

    /// The SDK script's error callback. Fatal; no retry.
    pub fn sdk_load_failed(&mut self, reason: impl Into<String>) -> Result<(), SdkError> {
        let reason = reason.into();
        self.sdk.failed(reason.clone())?;
        self.emit(EngineEvent::LoadFailed { reason });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Viewport and zone rendering
    // ------------------------------------------------------------------

    /// The map's "viewport settled" callback (pan/zoom came to rest).
    pub fn on_viewport_settled(&mut self) {
        if !self.gate("viewport_settled") {
            return;
        }
        self.scheduler
            .on_viewport_settled(&mut self.provider, &self.catalog);
    }

    /// A click that landed on a rendered primitive.
    ///
    /// Resolves the owning zone, pulses its overlay group with the
    /// selected style, opens the info popup at the click point, and emits
    /// [`EngineEvent::ZoneClicked`]. Clicks on markers the scheduler does
    /// not own (user marker, point markers) resolve to no zone and are
    /// ignored here.
    pub fn handle_zone_click(&mut self, primitive: PrimitiveId, at: LatLng, now: Instant) {
        if !self.gate("zone_click") {
            return;
        }
        let Some(zone_id) = self.scheduler.zone_at(primitive) else {
            debug!(%primitive, "click on unowned primitive, ignoring");
            return;
        };
        self.scheduler.pulse_zone(&mut self.provider, zone_id, now);
        if let Some(zone) = self.catalog.get(zone_id) {
            let content = overlay::zone_info(zone);
            if let Err(err) = self.overlays.open_info(&mut self.provider, at, &content) {
                warn!(zone = %zone_id, error = %err, "failed to open zone info popup");
            }
        }
        self.emit(EngineEvent::ZoneClicked { zone: zone_id, at });
    }

    /// A click on a saved-point marker: open its popup.
    ///
    /// Shares the popup singleton with zone clicks, so opening this closes
    /// any zone popup and vice versa.
    pub fn handle_saved_point_click(&mut self, point_id: u64) {
        if !self.gate("saved_point_click") {
            return;
        }
        let Some(point) = self.saved_points.iter().find(|p| p.id == point_id) else {
            debug!(point_id, "click on unknown saved point, ignoring");
            return;
        };
        let content = overlay::saved_point_info(point);
        let anchor = point.position;
        if let Err(err) = self.overlays.open_info(&mut self.provider, anchor, &content) {
            warn!(point_id, error = %err, "failed to open saved-point popup");
        }
    }

    /// A click on bare map surface (no primitive hit).
    ///
    /// In selection mode this picks the coordinate and places the
    /// selection marker; otherwise it closes any open popup.
    pub fn handle_map_click(&mut self, at: LatLng) {
        if !self.gate("map_click") {
            return;
        }
        match self.selection.handle_map_click(at) {
            Some(picked) => {
                if let Err(err) = self.overlays.set_selected_marker(&mut self.provider, picked)
                {
                    warn!(error = %err, "failed to place selection marker");
                }
            }
            None => self.overlays.close_info(&mut self.provider),
        }
    }

    /// Close the info popup (host-side close button).
    pub fn close_info(&mut self) {
        if !self.gate("close_info") {
            return;
        }
        self.overlays.close_info(&mut self.provider);
    }

    /// Advance time-based state: reverts expired click pulses.
    pub fn tick(&mut self, now: Instant) {
        if !self.sdk.is_ready() {
            return;
        }
        self.scheduler.tick(&mut self.provider, now);
    }

    // ------------------------------------------------------------------
    // Selection mode
    // ------------------------------------------------------------------

    /// Enter selection mode. Rejected (and [`EngineEvent::SignInRequired`]
    /// emitted) when the caller is not signed in.
    pub fn begin_selection(&mut self, authenticated: bool) -> Result<(), SelectionError> {
        match self.selection.begin(authenticated) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.emit(EngineEvent::SignInRequired);
                Err(err)
            }
        }
    }

    /// Confirm the picked coordinate: emits
    /// [`EngineEvent::CoordinateChosen`], removes the selection marker,
    /// and leaves the mode. `None` when nothing was picked.
    pub fn confirm_selection(&mut self) -> Option<LatLng> {
        let at = self.selection.confirm()?;
        if self.sdk.is_ready() {
            self.overlays.clear_selected_marker(&mut self.provider);
        }
        self.emit(EngineEvent::CoordinateChosen(at));
        Some(at)
    }

    /// Leave selection mode without saving; removes the marker.
    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
        if self.sdk.is_ready() {
            self.overlays.clear_selected_marker(&mut self.provider);
        }
    }

    // ------------------------------------------------------------------
    // Saved points
    // ------------------------------------------------------------------

    /// Replace the saved-point list and rebuild its markers.
    ///
    /// Safe before the SDK is ready: the list is kept and materialized
    /// when the load completes.
    pub fn set_saved_points(&mut self, points: Vec<SavedPoint>) {
        self.saved_points = points;
        if self.sdk.is_ready() {
            self.overlays
                .sync_saved_points(&mut self.provider, &self.saved_points);
        }
    }

    pub fn saved_points(&self) -> &[SavedPoint] {
        &self.saved_points
    }

    // ------------------------------------------------------------------
    // Live location
    // ------------------------------------------------------------------

    /// Start the continuous position watch, replacing (and thereby
    /// cancelling) any previous one.
    pub fn start_location_watch(
        &mut self,
        source: &dyn LocationSource,
    ) -> Result<(), LocationError> {
        let watch = source.watch(&self.config.watch_options)?;
        self.watch = Some(watch);
        Ok(())
    }

    /// Drain pending position updates from the watch and apply them.
    pub fn poll_location(&mut self) {
        let Some(mut watch) = self.watch.take() else {
            return;
        };
        while let Some(update) = watch.try_next() {
            match update {
                Ok(fix) => self.apply_fix(fix),
                Err(err) => self.location.record_error(&err),
            }
        }
        self.watch = Some(watch);
    }

    /// Feed a single position fix (e.g. the initial one-shot query).
    pub fn report_location(&mut self, fix: LocationFix) {
        self.apply_fix(fix);
    }

    /// Feed a geolocation failure. Non-fatal; the map keeps working from
    /// the last fix or the default center.
    pub fn report_location_error(&mut self, error: LocationError) {
        self.location.record_error(&error);
    }

    fn apply_fix(&mut self, fix: LocationFix) {
        let first = !self.location.has_live_location();
        self.location.record_fix(fix);
        if !self.sdk.is_ready() {
            return;
        }
        if let Err(err) = self
            .overlays
            .update_user_location(&mut self.provider, fix.position)
        {
            warn!(error = %err, "failed to update user-location marker");
            return;
        }
        // Only the first fix recenters; later ones just move the marker.
        if first {
            self.provider.set_center(fix.position);
        }
    }

    /// Stop the position watch, if one is running.
    pub fn stop_location_watch(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.stop();
        }
    }

    // ------------------------------------------------------------------
    // Teardown and introspection
    // ------------------------------------------------------------------

    /// Release everything: cancels the position watch and destroys every
    /// overlay and zone primitive. Idempotent.
    pub fn shutdown(&mut self) {
        self.stop_location_watch();
        if self.sdk.is_ready() {
            self.overlays.teardown(&mut self.provider);
            self.scheduler.clear_all(&mut self.provider);
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Host-side access to the provider adapter (viewport changes arrive
    /// through the SDK, not through the engine).
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    pub fn scheduler(&self) -> &ViewportRenderScheduler {
        &self.scheduler
    }

    pub fn overlays(&self) -> &OverlayLifecycleManager {
        &self.overlays
    }

    pub fn selection(&self) -> &SelectionModeController {
        &self.selection
    }

    pub fn location(&self) -> &LocationTracker {
        &self.location
    }

    /// Whether a zone is currently materialized on the map.
    pub fn is_zone_rendered(&self, zone: ZoneId) -> bool {
        self.scheduler.is_rendered(zone)
    }
}

impl<P: MapProvider> Drop for MapEngine<P> {
    fn drop(&mut self) {
        self.stop_location_watch();
    }
}
