//! Map provider abstraction.
//!
//! This module is the seam to the third-party map SDK: primitive creation
//! (polygon, polyline, custom overlay), a bounds-and-zoom query, and the
//! SDK's one-shot async load lifecycle. The engine talks only to the
//! [`MapProvider`] trait; [`FakeMapProvider`] stands in for the SDK in
//! tests and host prototypes.

mod fake;
mod loader;
mod types;

pub use fake::{FakeMapProvider, FakePrimitive};
pub use loader::{SdkError, SdkLoader, SdkState};
pub use types::{MapProvider, PrimitiveId, ProviderError};
