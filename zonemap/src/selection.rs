//! Selection-mode state machine.
//!
//! Gates the "pick a point on the map" interaction. While the mode is
//! active, map clicks pick a coordinate instead of opening zone info; the
//! confirmed coordinate is handed back to the hosting page. The
//! controller holds current state as plain fields read by its own
//! methods, so there is no "current mode" mirror for event listeners to
//! go stale on.

use thiserror::Error;
use tracing::debug;

use crate::coord::LatLng;

/// Current phase of the selection interaction.
///
/// `Idle → Selecting → Chosen → (confirm | cancel) → Idle`; confirm and
/// cancel are transitions, not resting states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    /// Selection mode off. Map clicks are not selection input.
    Idle,
    /// Waiting for the user to tap a location.
    Selecting,
    /// A coordinate has been picked and awaits confirm/cancel/replace.
    Chosen(LatLng),
}

/// Why selection mode could not be entered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// Saving points requires a signed-in user; the host decides how to
    /// prompt for login.
    #[error("sign-in required to save a point")]
    SignInRequired,
}

/// Small state machine gating point-picking interactions.
#[derive(Debug, Default)]
pub struct SelectionModeController {
    state: SelectionState,
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::Idle
    }
}

impl SelectionModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Whether map clicks currently act as selection input.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, SelectionState::Idle)
    }

    /// The picked coordinate, if any.
    pub fn chosen(&self) -> Option<LatLng> {
        match self.state {
            SelectionState::Chosen(at) => Some(at),
            _ => None,
        }
    }

    /// Enter selection mode. Re-entering while active discards any
    /// previously picked coordinate.
    ///
    /// Rejected when the caller is not authenticated: the controller
    /// signals this back to the host instead of silently entering the
    /// mode.
    pub fn begin(&mut self, authenticated: bool) -> Result<(), SelectionError> {
        if !authenticated {
            debug!("selection mode rejected: not signed in");
            return Err(SelectionError::SignInRequired);
        }
        self.state = SelectionState::Selecting;
        Ok(())
    }

    /// Feed a map click through the state machine.
    ///
    /// Returns the recorded coordinate when the click was consumed as a
    /// selection; a click while `Idle` is a no-op and must not mutate any
    /// selection state.
    pub fn handle_map_click(&mut self, at: LatLng) -> Option<LatLng> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Selecting | SelectionState::Chosen(_) => {
                self.state = SelectionState::Chosen(at);
                Some(at)
            }
        }
    }

    /// Confirm the picked coordinate and leave selection mode.
    ///
    /// Returns `None` when nothing was picked (confirm is only offered on
    /// a chosen point, but the host may still race a cancel).
    pub fn confirm(&mut self) -> Option<LatLng> {
        match self.state {
            SelectionState::Chosen(at) => {
                self.state = SelectionState::Idle;
                Some(at)
            }
            _ => None,
        }
    }

    /// Leave selection mode, discarding any picked coordinate.
    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
    }
}
