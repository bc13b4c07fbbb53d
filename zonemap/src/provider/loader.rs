//! SDK load lifecycle state machine.
//!
//! The map SDK loads asynchronously exactly once per page lifetime via an
//! external script fetch with success/error callbacks. Rather than relying
//! on callback ordering, the lifecycle is an explicit state machine and
//! every map operation is gated on [`SdkLoader::is_ready`].

use thiserror::Error;
use tracing::{info, warn};

/// Load state of the map SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkState {
    /// No load attempt yet.
    Uninitialized,
    /// Script fetch in flight.
    Loading,
    /// SDK available; map operations permitted.
    Ready,
    /// Script fetch failed. Fatal for the map surface; no automatic retry.
    Failed,
}

/// Invalid lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SdkError {
    #[error("SDK load already started (state: {0:?})")]
    AlreadyStarted(SdkState),
    #[error("SDK load completion reported while not loading (state: {0:?})")]
    NotLoading(SdkState),
}

/// Tracks the one-shot SDK load.
#[derive(Debug)]
pub struct SdkLoader {
    state: SdkState,
    failure: Option<String>,
}

impl SdkLoader {
    pub fn new() -> Self {
        Self {
            state: SdkState::Uninitialized,
            failure: None,
        }
    }

    pub fn state(&self) -> SdkState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SdkState::Ready
    }

    /// The failure reason, if the load failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Record that the script fetch was started.
    pub fn begin(&mut self) -> Result<(), SdkError> {
        if self.state != SdkState::Uninitialized {
            warn!(state = ?self.state, "rejected duplicate SDK load attempt");
            return Err(SdkError::AlreadyStarted(self.state));
        }
        self.state = SdkState::Loading;
        Ok(())
    }

    /// Record the success callback.
    pub fn loaded(&mut self) -> Result<(), SdkError> {
        if self.state != SdkState::Loading {
            warn!(state = ?self.state, "rejected SDK loaded callback");
            return Err(SdkError::NotLoading(self.state));
        }
        self.state = SdkState::Ready;
        info!("map SDK ready");
        Ok(())
    }

    /// Record the error callback.
    pub fn failed(&mut self, reason: String) -> Result<(), SdkError> {
        if self.state != SdkState::Loading {
            warn!(state = ?self.state, "rejected SDK failure callback");
            return Err(SdkError::NotLoading(self.state));
        }
        warn!(reason = %reason, "map SDK load failed");
        self.state = SdkState::Failed;
        self.failure = Some(reason);
        Ok(())
    }
}

impl Default for SdkLoader {
    fn default() -> Self {
        Self::new()
    }
}
