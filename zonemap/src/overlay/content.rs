//! Marker and popup content as pure visual descriptors.
//!
//! The original client assembled custom-overlay markup ad hoc per marker.
//! Here every marker/popup is a pure `render(data) -> descriptor`
//! function returning shape, style and text, so the same logic can target
//! any front-end stack; the map provider decides how to realize a
//! descriptor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Zone;
use crate::coord::LatLng;
use crate::style::{FillStyle, StrokeStyle};

/// A caller-supplied saved fishing point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPoint {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub memo: Option<String>,
    pub position: LatLng,
    pub created_at: DateTime<Utc>,
}

/// Geometric shape of a marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerShape {
    /// Filled circle, anchored at its center.
    Dot { diameter: u8 },
    /// Map pin, anchored at its tip.
    Pin,
}

/// Toolkit-independent description of a marker overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDescriptor {
    pub shape: MarkerShape,
    pub fill: FillStyle,
    pub stroke: StrokeStyle,
    /// Optional short text shown next to the marker.
    pub label: Option<String>,
}

/// Toolkit-independent description of the info popup.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoContent {
    pub title: String,
    /// Classification line, e.g. "No fishing".
    pub subtitle: Option<String>,
    /// Remaining detail lines in display order.
    pub lines: Vec<String>,
}

const USER_BLUE: &str = "#3B82F6";
const POINT_TEAL: &str = "#14B8A6";
const WHITE: &str = "#FFFFFF";

/// The live user-position marker: a blue dot with a white border.
pub fn user_location_marker() -> OverlayDescriptor {
    OverlayDescriptor {
        shape: MarkerShape::Dot { diameter: 20 },
        fill: FillStyle {
            color: USER_BLUE,
            opacity: 0.9,
        },
        stroke: StrokeStyle {
            color: WHITE,
            weight: 3,
            opacity: 1.0,
        },
        label: None,
    }
}

/// The transient marker shown while picking a point in selection mode.
pub fn selected_location_marker() -> OverlayDescriptor {
    OverlayDescriptor {
        shape: MarkerShape::Pin,
        fill: FillStyle {
            color: POINT_TEAL,
            opacity: 1.0,
        },
        stroke: StrokeStyle {
            color: WHITE,
            weight: 2,
            opacity: 1.0,
        },
        label: None,
    }
}

/// A saved-point marker carries the point's name as its label.
pub fn saved_point_marker(point: &SavedPoint) -> OverlayDescriptor {
    OverlayDescriptor {
        shape: MarkerShape::Pin,
        fill: FillStyle {
            color: POINT_TEAL,
            opacity: 0.9,
        },
        stroke: StrokeStyle {
            color: WHITE,
            weight: 2,
            opacity: 1.0,
        },
        label: Some(point.name.clone()),
    }
}

/// Popup content for a clicked zone.
pub fn zone_info(zone: &Zone) -> InfoContent {
    let mut lines = Vec::new();
    if let Some(region) = &zone.region {
        lines.push(region.clone());
    }
    if let Some(section) = &zone.section {
        lines.push(section.clone());
    }
    if let Some(restriction) = &zone.restriction {
        lines.push(restriction.clone());
    }
    InfoContent {
        title: zone.name.clone(),
        subtitle: Some(zone.kind.label().to_string()),
        lines,
    }
}

/// Popup content for a clicked saved point.
pub fn saved_point_info(point: &SavedPoint) -> InfoContent {
    let mut lines = Vec::new();
    if let Some(memo) = &point.memo {
        lines.push(memo.clone());
    }
    lines.push(format!(
        "{:.4}, {:.4} · {}",
        point.position.lat,
        point.position.lng,
        point.created_at.format("%Y-%m-%d")
    ));
    InfoContent {
        title: point.name.clone(),
        subtitle: None,
        lines,
    }
}
