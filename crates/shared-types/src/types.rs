use serde::{Deserialize, Serialize};

/// What an overlay represents. Only affects labelling, never geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementKind {
    Signature,
    Stamp,
}

impl PlacementKind {
    /// Human label used in notifications ("Signature added at ...")
    pub fn label(&self) -> &'static str {
        match self {
            PlacementKind::Signature => "Signature",
            PlacementKind::Stamp => "Stamp",
        }
    }
}

impl std::fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementKind::Signature => write!(f, "signature"),
            PlacementKind::Stamp => write!(f, "stamp"),
        }
    }
}

impl std::str::FromStr for PlacementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signature" => Ok(PlacementKind::Signature),
            "stamp" => Ok(PlacementKind::Stamp),
            other => Err(format!("Unknown placement kind: {}", other)),
        }
    }
}

/// Top-left corner in display pixels, relative to the rendered page image
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

impl DisplayPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box size in display pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Size at which a page preview is currently rendered on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewSize {
    pub width: f64,
    pub height: f64,
}

impl PreviewSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A zero or non-finite preview cannot serve as a scale reference
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&PlacementKind::Stamp).unwrap();
        assert_eq!(json, "\"stamp\"");
        let kind: PlacementKind = serde_json::from_str("\"signature\"").unwrap();
        assert_eq!(kind, PlacementKind::Signature);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Stamp".parse::<PlacementKind>(), Ok(PlacementKind::Stamp));
        assert!("initials".parse::<PlacementKind>().is_err());
    }

    #[test]
    fn test_preview_usable() {
        assert!(PreviewSize::new(600.0, 777.0).is_usable());
        assert!(!PreviewSize::new(0.0, 777.0).is_usable());
        assert!(!PreviewSize::new(600.0, f64::NAN).is_usable());
    }
}
