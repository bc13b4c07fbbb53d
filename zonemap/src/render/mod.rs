//! Viewport-driven zone rendering.
//!
//! Translates viewport-settled events into a minimal sequence of
//! draw/clear operations against the map provider, tracking which zones
//! are currently materialized.

mod scheduler;

pub use scheduler::{SchedulerConfig, ViewportRenderScheduler};
