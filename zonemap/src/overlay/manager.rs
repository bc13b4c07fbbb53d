//! Lifecycle manager for markers and the singleton info popup.

use tracing::{debug, warn};

use crate::coord::LatLng;
use crate::provider::{MapProvider, PrimitiveId, ProviderError};

use super::content::{self, InfoContent, SavedPoint};

/// Owns every marker/popup handle the engine creates.
///
/// Each marker kind has its own create/update/destroy rule; see the
/// methods. Handles never leave this struct.
#[derive(Debug, Default)]
pub struct OverlayLifecycleManager {
    user_marker: Option<PrimitiveId>,
    selected_marker: Option<PrimitiveId>,
    point_markers: Vec<PrimitiveId>,
    info: Option<PrimitiveId>,
}

impl OverlayLifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the user-location marker on the first report, then move the
    /// same instance in place on every later report. Never
    /// destroy-and-recreate: that would drop the entry animation and
    /// flicker on frequent geolocation updates.
    pub fn update_user_location(
        &mut self,
        provider: &mut dyn MapProvider,
        position: LatLng,
    ) -> Result<(), ProviderError> {
        match self.user_marker {
            Some(id) => provider.move_marker(id, position),
            None => {
                let id = provider.add_marker(position, &content::user_location_marker())?;
                self.user_marker = Some(id);
                debug!(%position, "created user-location marker");
                Ok(())
            }
        }
    }

    pub fn user_marker(&self) -> Option<PrimitiveId> {
        self.user_marker
    }

    /// Place (or replace) the transient selection marker.
    pub fn set_selected_marker(
        &mut self,
        provider: &mut dyn MapProvider,
        position: LatLng,
    ) -> Result<(), ProviderError> {
        if let Some(old) = self.selected_marker.take() {
            provider.remove(old);
        }
        let id = provider.add_marker(position, &content::selected_location_marker())?;
        self.selected_marker = Some(id);
        Ok(())
    }

    /// Destroy the selection marker, if present.
    pub fn clear_selected_marker(&mut self, provider: &mut dyn MapProvider) {
        if let Some(id) = self.selected_marker.take() {
            provider.remove(id);
        }
    }

    pub fn selected_marker(&self) -> Option<PrimitiveId> {
        self.selected_marker
    }

    /// Rebuild the saved-point marker set from the new list.
    ///
    /// Destroys every current point marker and recreates the full set; no
    /// incremental diffing. Correct for any list change at the cost of
    /// churn on large lists. A creation failure for one point is isolated.
    pub fn sync_saved_points(&mut self, provider: &mut dyn MapProvider, points: &[SavedPoint]) {
        for id in self.point_markers.drain(..) {
            provider.remove(id);
        }
        for point in points {
            match provider.add_marker(point.position, &content::saved_point_marker(point)) {
                Ok(id) => self.point_markers.push(id),
                Err(err) => {
                    warn!(point = %point.name, error = %err, "failed to create saved-point marker");
                }
            }
        }
        debug!(count = self.point_markers.len(), "saved-point markers rebuilt");
    }

    pub fn point_marker_count(&self) -> usize {
        self.point_markers.len()
    }

    pub fn point_markers(&self) -> &[PrimitiveId] {
        &self.point_markers
    }

    /// Open the info popup, closing any existing instance first.
    ///
    /// At most one popup exists at any time, regardless of whether it was
    /// opened from a zone click or a point click.
    pub fn open_info(
        &mut self,
        provider: &mut dyn MapProvider,
        anchor: LatLng,
        content: &InfoContent,
    ) -> Result<(), ProviderError> {
        self.close_info(provider);
        let id = provider.add_info(anchor, content)?;
        self.info = Some(id);
        Ok(())
    }

    /// Close the info popup. No-op when none is open.
    pub fn close_info(&mut self, provider: &mut dyn MapProvider) {
        if let Some(id) = self.info.take() {
            provider.remove(id);
        }
    }

    pub fn info_overlay(&self) -> Option<PrimitiveId> {
        self.info
    }

    /// Destroy every owned handle. Used at component teardown.
    pub fn teardown(&mut self, provider: &mut dyn MapProvider) {
        if let Some(id) = self.user_marker.take() {
            provider.remove(id);
        }
        self.clear_selected_marker(provider);
        for id in self.point_markers.drain(..) {
            provider.remove(id);
        }
        self.close_info(provider);
    }
}
