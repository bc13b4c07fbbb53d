//! Viewport render scheduler and rendered-zone cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::catalog::{Geometry, Zone, ZoneCatalog, ZoneId, ZoneKind};
use crate::provider::{MapProvider, PrimitiveId, ProviderError};
use crate::style;

/// Scheduler tuning knobs.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Zoom level above which (more zoomed out) zone rendering is
    /// suspended entirely.
    pub lod_threshold: u8,
    /// How long a clicked zone keeps its selected style before reverting.
    pub pulse_duration: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lod_threshold: 10,
            pulse_duration: Duration::from_secs(2),
        }
    }
}

/// Overlay group for one rendered zone.
#[derive(Debug)]
struct RenderedZone {
    kind: ZoneKind,
    primitives: Vec<PrimitiveId>,
}

/// A pending style pulse awaiting its revert deadline.
#[derive(Debug)]
struct Pulse {
    zone: ZoneId,
    expires: Instant,
}

/// Decides which zones to materialize on each viewport-settled event.
///
/// A zone id is in the rendered set if and only if exactly one overlay
/// group for it exists on the map. Membership only grows while the zoom
/// stays at or below the LOD threshold; crossing the threshold clears the
/// set and every native primitive wholesale. Zones that scroll out of the
/// viewport are deliberately left rendered — the memory-for-simplicity
/// trade is part of the contract, not an accident.
#[derive(Debug)]
pub struct ViewportRenderScheduler {
    config: SchedulerConfig,
    rendered: HashMap<ZoneId, RenderedZone>,
    primitive_zones: HashMap<PrimitiveId, ZoneId>,
    pulses: Vec<Pulse>,
}

impl ViewportRenderScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            rendered: HashMap::new(),
            primitive_zones: HashMap::new(),
            pulses: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SchedulerConfig::default())
    }

    /// Run one scheduling pass against the provider's current viewport.
    ///
    /// Safe to invoke redundantly: already-rendered zones are skipped by
    /// an O(1) membership check, so an unchanged viewport never duplicates
    /// overlays. Cost is O(Z) over the catalog.
    pub fn on_viewport_settled(
        &mut self,
        provider: &mut dyn MapProvider,
        catalog: &ZoneCatalog,
    ) {
        let viewport = provider.viewport();

        if viewport.zoom > self.config.lod_threshold {
            if !self.rendered.is_empty() {
                debug!(
                    zoom = viewport.zoom,
                    threshold = self.config.lod_threshold,
                    cleared = self.rendered.len(),
                    "zoomed out past LOD threshold, suspending zone rendering"
                );
                self.clear_all(provider);
            }
            return;
        }

        let mut drawn = 0usize;
        for zone in catalog.list() {
            if self.rendered.contains_key(&zone.id) {
                continue;
            }
            // Representative point only: zones whose first coordinate is
            // outside the viewport are not drawn even when they intersect
            // it. Known limitation of the cheap visibility proxy.
            if !viewport.bounds.contains(&zone.representative_point()) {
                continue;
            }
            match self.draw_zone(provider, zone) {
                Ok(primitives) => {
                    for id in &primitives {
                        self.primitive_zones.insert(*id, zone.id);
                    }
                    self.rendered.insert(
                        zone.id,
                        RenderedZone {
                            kind: zone.kind,
                            primitives,
                        },
                    );
                    drawn += 1;
                }
                // One zone failing must not abort the rest of the pass.
                Err(err) => {
                    warn!(zone = %zone.id, error = %err, "failed to draw zone, skipping")
                }
            }
        }

        if drawn > 0 {
            debug!(drawn, rendered = self.rendered.len(), "scheduler pass complete");
        } else {
            trace!(rendered = self.rendered.len(), "scheduler pass drew nothing");
        }
    }

    /// Materialize one zone; on any primitive failure, removes the
    /// partial group and reports the error.
    fn draw_zone(
        &mut self,
        provider: &mut dyn MapProvider,
        zone: &Zone,
    ) -> Result<Vec<PrimitiveId>, ProviderError> {
        let style = style::base_style(zone.kind);
        let mut primitives = Vec::new();

        let result = (|| match &zone.geometry {
            Geometry::Ring(ring) => {
                primitives.push(provider.add_polygon(ring, &style)?);
                Ok(())
            }
            Geometry::MultiRing(rings) => {
                for ring in rings {
                    primitives.push(provider.add_polygon(ring, &style)?);
                }
                Ok(())
            }
            Geometry::Path(path) => {
                primitives.push(provider.add_polyline(path, &style)?);
                Ok(())
            }
        })();

        match result {
            Ok(()) => Ok(primitives),
            Err(err) => {
                for id in primitives {
                    provider.remove(id);
                }
                Err(err)
            }
        }
    }

    /// Destroy every rendered overlay and empty the set.
    pub fn clear_all(&mut self, provider: &mut dyn MapProvider) {
        for (_, group) in self.rendered.drain() {
            for id in group.primitives {
                provider.remove(id);
            }
        }
        self.primitive_zones.clear();
        self.pulses.clear();
    }

    /// Which zone a clicked primitive belongs to.
    pub fn zone_at(&self, primitive: PrimitiveId) -> Option<ZoneId> {
        self.primitive_zones.get(&primitive).copied()
    }

    pub fn is_rendered(&self, zone: ZoneId) -> bool {
        self.rendered.contains_key(&zone)
    }

    pub fn rendered_len(&self) -> usize {
        self.rendered.len()
    }

    pub fn rendered_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.rendered.keys().copied()
    }

    /// Apply the selected style to a zone's overlay group and schedule the
    /// revert. A second pulse on the same zone restarts the timer. The
    /// pulse is visual only: it never blocks, and [`tick`] performs the
    /// revert.
    ///
    /// [`tick`]: ViewportRenderScheduler::tick
    pub fn pulse_zone(&mut self, provider: &mut dyn MapProvider, zone: ZoneId, now: Instant) {
        let Some(group) = self.rendered.get(&zone) else {
            return;
        };
        let selected = style::selected_style(group.kind);
        for id in &group.primitives {
            if let Err(err) = provider.set_style(*id, &selected) {
                warn!(zone = %zone, error = %err, "failed to apply selected style");
            }
        }
        let expires = now + self.config.pulse_duration;
        match self.pulses.iter_mut().find(|p| p.zone == zone) {
            Some(pulse) => pulse.expires = expires,
            None => self.pulses.push(Pulse { zone, expires }),
        }
    }

    /// Revert expired pulses. The host event loop calls this with the
    /// current instant; there is no internal timer.
    pub fn tick(&mut self, provider: &mut dyn MapProvider, now: Instant) {
        let mut index = 0;
        while index < self.pulses.len() {
            if self.pulses[index].expires > now {
                index += 1;
                continue;
            }
            let pulse = self.pulses.swap_remove(index);
            // The group may have been cleared by an LOD exit meanwhile.
            if let Some(group) = self.rendered.get(&pulse.zone) {
                let base = style::base_style(group.kind);
                for id in &group.primitives {
                    if let Err(err) = provider.set_style(*id, &base) {
                        warn!(zone = %pulse.zone, error = %err, "failed to revert pulse style");
                    }
                }
            }
        }
    }

    pub fn active_pulse_count(&self) -> usize {
        self.pulses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Zone, ZoneCatalog, ZoneKind};
    use crate::coord::{Bounds, LatLng};
    use crate::provider::FakeMapProvider;
    use crate::style;

    fn p(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    fn ring_zone(id: u32, lat: f64, lng: f64) -> Zone {
        Zone::new(
            ZoneId(id),
            format!("zone {id}"),
            ZoneKind::Prohibited,
            Geometry::Ring(vec![
                p(lat, lng),
                p(lat + 0.01, lng + 0.01),
                p(lat - 0.01, lng + 0.01),
            ]),
        )
        .unwrap()
    }

    fn path_zone(id: u32, lat: f64, lng: f64) -> Zone {
        Zone::new(
            ZoneId(id),
            format!("river {id}"),
            ZoneKind::Restricted,
            Geometry::Path(vec![p(lat, lng), p(lat + 0.05, lng + 0.05)]),
        )
        .unwrap()
    }

    fn small_catalog() -> ZoneCatalog {
        ZoneCatalog::from_zones(vec![
            ring_zone(1, 37.52, 126.93),
            ring_zone(2, 35.15, 129.16),
            path_zone(3, 36.32, 127.38),
        ])
    }

    // ========================================================================
    // Draw and LOD behavior
    // ========================================================================

    #[test]
    fn test_draws_zones_inside_bounds() {
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();

        scheduler.on_viewport_settled(&mut provider, &catalog);

        assert_eq!(scheduler.rendered_len(), 3);
        assert_eq!(provider.primitive_count(), 3);
        assert!(scheduler.is_rendered(ZoneId(3)));
    }

    #[test]
    fn test_skips_zones_outside_bounds() {
        let mut provider = FakeMapProvider::new();
        // Viewport over Busan only.
        provider.set_viewport(Bounds::new(p(35.0, 129.0), p(35.3, 129.3)), 7);
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();

        scheduler.on_viewport_settled(&mut provider, &catalog);

        assert_eq!(scheduler.rendered_len(), 1);
        assert!(scheduler.is_rendered(ZoneId(2)));
    }

    #[test]
    fn test_zoom_above_threshold_clears_everything() {
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();

        scheduler.on_viewport_settled(&mut provider, &catalog);
        assert_eq!(scheduler.rendered_len(), 3);

        provider.set_zoom(12);
        scheduler.on_viewport_settled(&mut provider, &catalog);

        assert_eq!(scheduler.rendered_len(), 0);
        assert_eq!(provider.primitive_count(), 0);
    }

    #[test]
    fn test_rerender_after_lod_band_reentry_uses_fresh_handles() {
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();

        scheduler.on_viewport_settled(&mut provider, &catalog);
        let first_total = provider.created_total();

        provider.set_zoom(12);
        scheduler.on_viewport_settled(&mut provider, &catalog);
        provider.set_zoom(7);
        scheduler.on_viewport_settled(&mut provider, &catalog);

        // Same zone ids, new native handles.
        assert_eq!(scheduler.rendered_len(), 3);
        assert_eq!(provider.created_total(), first_total * 2);
    }

    #[test]
    fn test_idempotent_for_unchanged_viewport() {
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();

        scheduler.on_viewport_settled(&mut provider, &catalog);
        let rendered = scheduler.rendered_len();
        let created = provider.created_total();

        scheduler.on_viewport_settled(&mut provider, &catalog);

        assert_eq!(scheduler.rendered_len(), rendered);
        assert_eq!(provider.created_total(), created);
    }

    #[test]
    fn test_panning_only_accumulates() {
        let mut provider = FakeMapProvider::new();
        provider.set_viewport(Bounds::new(p(37.0, 126.5), p(38.0, 127.5)), 7);
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();

        scheduler.on_viewport_settled(&mut provider, &catalog);
        assert_eq!(scheduler.rendered_len(), 1); // Seoul zone

        // Pan south; Seoul zone scrolls out but stays rendered.
        provider.set_viewport(Bounds::new(p(35.0, 129.0), p(35.3, 129.3)), 7);
        scheduler.on_viewport_settled(&mut provider, &catalog);

        assert_eq!(scheduler.rendered_len(), 2);
        assert!(scheduler.is_rendered(ZoneId(1)));
        assert!(scheduler.is_rendered(ZoneId(2)));
    }

    #[test]
    fn test_multi_ring_draws_one_polygon_per_ring() {
        let zone = Zone::new(
            ZoneId(9),
            "islets".into(),
            ZoneKind::Prohibited,
            Geometry::MultiRing(vec![
                vec![p(34.78, 126.38), p(34.79, 126.39), p(34.77, 126.40)],
                vec![p(34.75, 126.36), p(34.76, 126.37), p(34.74, 126.38)],
            ]),
        )
        .unwrap();
        let catalog = ZoneCatalog::from_zones(vec![zone]);
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();

        scheduler.on_viewport_settled(&mut provider, &catalog);

        assert_eq!(scheduler.rendered_len(), 1);
        assert_eq!(provider.primitive_count(), 2);
        // Both primitives route back to the one zone.
        let ids: Vec<_> = (1..=2)
            .map(|n| scheduler.zone_at(crate::provider::PrimitiveId(n)))
            .collect();
        assert_eq!(ids, vec![Some(ZoneId(9)), Some(ZoneId(9))]);
    }

    // ========================================================================
    // Failure isolation
    // ========================================================================

    #[test]
    fn test_single_zone_failure_does_not_abort_batch() {
        let mut provider = FakeMapProvider::new();
        provider.fail_next_creates(1);
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();

        scheduler.on_viewport_settled(&mut provider, &catalog);

        // First zone failed; the other two drew.
        assert_eq!(scheduler.rendered_len(), 2);
        assert!(!scheduler.is_rendered(ZoneId(1)));
    }

    #[test]
    fn test_partial_multi_ring_failure_removes_partials() {
        let zone = Zone::new(
            ZoneId(9),
            "islets".into(),
            ZoneKind::Prohibited,
            Geometry::MultiRing(vec![
                vec![p(34.78, 126.38), p(34.79, 126.39), p(34.77, 126.40)],
                vec![p(34.75, 126.36), p(34.76, 126.37), p(34.74, 126.38)],
            ]),
        )
        .unwrap();
        let catalog = ZoneCatalog::from_zones(vec![zone]);
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();

        // First ring succeeds, second fails; the partial polygon must go.
        provider.fail_nth_create(2);
        scheduler.on_viewport_settled(&mut provider, &catalog);

        assert_eq!(scheduler.rendered_len(), 0);
        assert_eq!(provider.primitive_count(), 0);
    }

    // ========================================================================
    // Click pulse
    // ========================================================================

    #[test]
    fn test_pulse_applies_and_reverts() {
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();
        scheduler.on_viewport_settled(&mut provider, &catalog);

        let primitive = crate::provider::PrimitiveId(1);
        let zone = scheduler.zone_at(primitive).unwrap();
        let kind = ZoneKind::Prohibited;

        let start = Instant::now();
        scheduler.pulse_zone(&mut provider, zone, start);
        assert_eq!(
            provider.style_of(primitive),
            Some(&style::selected_style(kind))
        );
        assert_eq!(scheduler.active_pulse_count(), 1);

        // Not yet expired.
        scheduler.tick(&mut provider, start + Duration::from_secs(1));
        assert_eq!(
            provider.style_of(primitive),
            Some(&style::selected_style(kind))
        );

        scheduler.tick(&mut provider, start + Duration::from_secs(3));
        assert_eq!(provider.style_of(primitive), Some(&style::base_style(kind)));
        assert_eq!(scheduler.active_pulse_count(), 0);
    }

    #[test]
    fn test_repeat_click_restarts_pulse() {
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();
        scheduler.on_viewport_settled(&mut provider, &catalog);

        let zone = ZoneId(1);
        let start = Instant::now();
        scheduler.pulse_zone(&mut provider, zone, start);
        scheduler.pulse_zone(&mut provider, zone, start + Duration::from_secs(1));
        assert_eq!(scheduler.active_pulse_count(), 1);

        // Original deadline passed, restarted one has not.
        scheduler.tick(&mut provider, start + Duration::from_millis(2500));
        let primitive = crate::provider::PrimitiveId(1);
        assert_eq!(
            provider.style_of(primitive),
            Some(&style::selected_style(ZoneKind::Prohibited))
        );

        scheduler.tick(&mut provider, start + Duration::from_secs(4));
        assert_eq!(
            provider.style_of(primitive),
            Some(&style::base_style(ZoneKind::Prohibited))
        );
    }

    #[test]
    fn test_pulse_on_unrendered_zone_is_noop() {
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();

        scheduler.pulse_zone(&mut provider, ZoneId(42), Instant::now());
        assert_eq!(scheduler.active_pulse_count(), 0);
    }

    #[test]
    fn test_lod_clear_drops_pending_pulses() {
        let mut provider = FakeMapProvider::new();
        let mut scheduler = ViewportRenderScheduler::with_defaults();
        let catalog = small_catalog();
        scheduler.on_viewport_settled(&mut provider, &catalog);

        scheduler.pulse_zone(&mut provider, ZoneId(1), Instant::now());
        provider.set_zoom(12);
        scheduler.on_viewport_settled(&mut provider, &catalog);

        assert_eq!(scheduler.active_pulse_count(), 0);
    }
}
