//! Quick-placement presets
//!
//! Named positions expressed as percentages of the displayed page, so they
//! land in the same spot whatever the zoom level.

use serde::{Deserialize, Serialize};
use shared_types::PlacementKind;

/// Percentages of the displayed page: left edge, top edge and width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresetGeometry {
    pub x_percent: f64,
    pub y_percent: f64,
    pub width_percent: f64,
}

impl PresetGeometry {
    pub fn new(x_percent: f64, y_percent: f64, width_percent: f64) -> Self {
        Self {
            x_percent,
            y_percent,
            width_percent,
        }
    }
}

/// Default overlay width for a kind, as a percentage of the displayed page width
pub fn default_width_percent(kind: PlacementKind) -> f64 {
    match kind {
        PlacementKind::Signature => 20.0,
        PlacementKind::Stamp => 15.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickPreset {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl QuickPreset {
    pub const ALL: [QuickPreset; 8] = [
        QuickPreset::TopLeft,
        QuickPreset::TopCenter,
        QuickPreset::TopRight,
        QuickPreset::MiddleLeft,
        QuickPreset::MiddleRight,
        QuickPreset::BottomLeft,
        QuickPreset::BottomCenter,
        QuickPreset::BottomRight,
    ];

    /// Top-left corner of the overlay as (x%, y%) of the displayed page
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            QuickPreset::TopLeft => (10.0, 5.0),
            QuickPreset::TopCenter => (50.0, 5.0),
            QuickPreset::TopRight => (75.0, 5.0),
            QuickPreset::MiddleLeft => (10.0, 50.0),
            QuickPreset::MiddleRight => (75.0, 50.0),
            QuickPreset::BottomLeft => (10.0, 88.0),
            QuickPreset::BottomCenter => (50.0, 88.0),
            QuickPreset::BottomRight => (75.0, 88.0),
        }
    }

    pub fn geometry(&self, kind: PlacementKind) -> PresetGeometry {
        let (x, y) = self.anchor();
        PresetGeometry::new(x, y, default_width_percent(kind))
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickPreset::TopLeft => "Top Left",
            QuickPreset::TopCenter => "Top Center",
            QuickPreset::TopRight => "Top Right",
            QuickPreset::MiddleLeft => "Middle Left",
            QuickPreset::MiddleRight => "Middle Right",
            QuickPreset::BottomLeft => "Bottom Left",
            QuickPreset::BottomCenter => "Bottom Center",
            QuickPreset::BottomRight => "Bottom Right",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            QuickPreset::TopLeft => "top-left",
            QuickPreset::TopCenter => "top-center",
            QuickPreset::TopRight => "top-right",
            QuickPreset::MiddleLeft => "middle-left",
            QuickPreset::MiddleRight => "middle-right",
            QuickPreset::BottomLeft => "bottom-left",
            QuickPreset::BottomCenter => "bottom-center",
            QuickPreset::BottomRight => "bottom-right",
        }
    }
}

impl std::fmt::Display for QuickPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for QuickPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        QuickPreset::ALL
            .iter()
            .find(|p| p.slug() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown preset: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_bottom_right() {
        let g = QuickPreset::BottomRight.geometry(PlacementKind::Signature);
        assert_eq!(g, PresetGeometry::new(75.0, 88.0, 20.0));
    }

    #[test]
    fn test_stamp_uses_narrower_width() {
        let g = QuickPreset::BottomCenter.geometry(PlacementKind::Stamp);
        assert_eq!(g, PresetGeometry::new(50.0, 88.0, 15.0));
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("top-left".parse(), Ok(QuickPreset::TopLeft));
        assert_eq!("Bottom Right".parse(), Ok(QuickPreset::BottomRight));
        assert_eq!("middle_right".parse(), Ok(QuickPreset::MiddleRight));
        assert!("center".parse::<QuickPreset>().is_err());
    }

    #[test]
    fn test_display_roundtrips() {
        for preset in QuickPreset::ALL {
            assert_eq!(preset.to_string().parse(), Ok(preset));
        }
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&QuickPreset::BottomCenter).unwrap();
        assert_eq!(json, "\"bottom-center\"");
    }
}
