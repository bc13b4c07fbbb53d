//! Engine configuration.

use crate::coord::LatLng;
use crate::location::{LocationOptions, DEFAULT_CENTER};
use crate::render::SchedulerConfig;

/// Configuration for a [`MapEngine`](super::MapEngine) instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Zoom level the map opens at.
    pub initial_zoom: u8,
    /// Center used until a live location arrives.
    pub default_center: LatLng,
    /// Render scheduler tuning (LOD threshold, pulse duration).
    pub scheduler: SchedulerConfig,
    /// Options for the continuous geolocation watch.
    pub watch_options: LocationOptions,
    /// Capacity of the host-facing event channel.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 7,
            default_center: DEFAULT_CENTER,
            scheduler: SchedulerConfig::default(),
            watch_options: LocationOptions::watch(),
            event_capacity: 32,
        }
    }
}
