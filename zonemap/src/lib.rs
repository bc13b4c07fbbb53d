//! Zonemap - zone rendering and overlay engine for fishing-regulation maps
//!
//! This library owns everything a map-centric fishing app needs between the
//! hosting page and the map SDK: the fishing-zone catalog, viewport-driven
//! zone rendering with a level-of-detail cutoff, marker and popup
//! lifecycle, a point-selection mode, and live-location tracking.
//!
//! # High-Level API
//!
//! The [`engine`] module provides the facade most hosts use:
//!
//! ```ignore
//! use zonemap::catalog::ZoneCatalog;
//! use zonemap::engine::{EngineConfig, MapEngine};
//!
//! let catalog = ZoneCatalog::from_json_str(zone_json)?;
//! let mut engine = MapEngine::new(provider, catalog, EngineConfig::default());
//! let mut events = engine.subscribe();
//!
//! engine.begin_sdk_load()?;
//! // ...SDK script callbacks route to engine.sdk_loaded() / sdk_load_failed()
//! ```
//!
//! The host implements [`provider::MapProvider`] over its real map SDK and
//! routes SDK callbacks (viewport settled, clicks, geolocation updates)
//! into the engine's methods.

pub mod catalog;
pub mod coord;
pub mod engine;
pub mod location;
pub mod logging;
pub mod overlay;
pub mod provider;
pub mod render;
pub mod selection;
pub mod style;

/// Version of the zonemap library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
