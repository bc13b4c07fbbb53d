//! Zone rendering styles.
//!
//! One base style and one "selected" variant per zone kind. The lookup is
//! a plain `match` over [`ZoneKind`], so it is total: any type tag that
//! would have no defined rendering was already rejected at catalog
//! ingestion. Color values are the muted palette from the production data
//! set.

use crate::catalog::ZoneKind;

/// Polygon fill appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    /// Hex color, `#RRGGBB`.
    pub color: &'static str,
    pub opacity: f32,
}

/// Polygon/polyline stroke appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Hex color, `#RRGGBB`.
    pub color: &'static str,
    /// Line weight in pixels.
    pub weight: u8,
    pub opacity: f32,
}

/// Complete appearance of a zone overlay.
///
/// Polylines use only the stroke half; polygons use both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneStyle {
    pub fill: FillStyle,
    pub stroke: StrokeStyle,
}

const PROHIBITED: ZoneStyle = ZoneStyle {
    fill: FillStyle {
        color: "#8B4D4D",
        opacity: 0.35,
    },
    stroke: StrokeStyle {
        color: "#6B3D3D",
        weight: 2,
        opacity: 0.6,
    },
};

const PROHIBITED_SELECTED: ZoneStyle = ZoneStyle {
    fill: FillStyle {
        color: "#8B4D4D",
        opacity: 0.55,
    },
    stroke: StrokeStyle {
        color: "#6B3D3D",
        weight: 3,
        opacity: 0.9,
    },
};

const RESTRICTED: ZoneStyle = ZoneStyle {
    fill: FillStyle {
        color: "#9E8B4D",
        opacity: 0.35,
    },
    stroke: StrokeStyle {
        color: "#7E6B3D",
        weight: 2,
        opacity: 0.6,
    },
};

const RESTRICTED_SELECTED: ZoneStyle = ZoneStyle {
    fill: FillStyle {
        color: "#9E8B4D",
        opacity: 0.55,
    },
    stroke: StrokeStyle {
        color: "#7E6B3D",
        weight: 3,
        opacity: 0.9,
    },
};

/// Base style for a zone kind.
pub fn base_style(kind: ZoneKind) -> ZoneStyle {
    match kind {
        ZoneKind::Prohibited => PROHIBITED,
        ZoneKind::Restricted => RESTRICTED,
    }
}

/// Style applied while a zone is pulsing after a click.
pub fn selected_style(kind: ZoneKind) -> ZoneStyle {
    match kind {
        ZoneKind::Prohibited => PROHIBITED_SELECTED,
        ZoneKind::Restricted => RESTRICTED_SELECTED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_total_over_kinds() {
        for kind in [ZoneKind::Prohibited, ZoneKind::Restricted] {
            let base = base_style(kind);
            let selected = selected_style(kind);
            assert!(base.fill.opacity < selected.fill.opacity);
            assert!(base.stroke.weight < selected.stroke.weight);
            // Colors stay put across the pulse; only emphasis changes.
            assert_eq!(base.fill.color, selected.fill.color);
        }
    }

    #[test]
    fn test_kinds_visually_distinct() {
        assert_ne!(
            base_style(ZoneKind::Prohibited).fill.color,
            base_style(ZoneKind::Restricted).fill.color
        );
    }
}
