//! Coordinate transformation between the rendered preview and PDF points
//!
//! Display space is pixels relative to the top-left corner of the page image
//! as it is currently rendered on screen. Native space is PDF points at
//! scale 1.0, measured from the same corner. Flipping into the bottom-left
//! PDF origin is left to the signing service.

use serde::Serialize;
use shared_types::{DisplayPoint, DisplaySize, PreviewSize};

/// Height-to-width ratio locked on every placement
pub const ASPECT_RATIO: f64 = 0.33;

/// Per-axis factors that map display pixels onto native points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    /// Scale for a page of `native_width` x `native_height` points shown at `preview`.
    ///
    /// Returns `None` while the preview has no usable size.
    pub fn display_to_native(
        native_width: f64,
        native_height: f64,
        preview: PreviewSize,
    ) -> Option<Self> {
        if !preview.is_usable() {
            return None;
        }

        Some(Self {
            x: native_width / preview.width,
            y: native_height / preview.height,
        })
    }

    /// Factors for the opposite direction (native to display)
    pub fn inverse(&self) -> Self {
        Self {
            x: 1.0 / self.x,
            y: 1.0 / self.y,
        }
    }
}

/// Rectangle in native PDF points (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NativeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NativeRect {
    /// Integer points `(x, y, width, height)` as sent to the signing service
    pub fn rounded(&self) -> (i64, i64, i64, i64) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            self.width.round() as i64,
            self.height.round() as i64,
        )
    }
}

/// Convert a display-space box to native points
pub fn display_to_native(
    position: DisplayPoint,
    size: DisplaySize,
    scale: ScaleFactors,
) -> NativeRect {
    NativeRect {
        x: position.x * scale.x,
        y: position.y * scale.y,
        width: size.width * scale.x,
        height: size.height * scale.y,
    }
}

/// Convert a native box back to display space using the same display->native scale
pub fn native_to_display(rect: &NativeRect, scale: ScaleFactors) -> (DisplayPoint, DisplaySize) {
    let inv = scale.inverse();
    (
        DisplayPoint::new(rect.x * inv.x, rect.y * inv.y),
        DisplaySize::new(rect.width * inv.x, rect.height * inv.y),
    )
}

/// Resolve a percentage-based position against the displayed page size.
///
/// Height is derived from the width through [`ASPECT_RATIO`], so the result
/// does not depend on the page's own aspect ratio.
pub fn percent_to_display(
    x_percent: f64,
    y_percent: f64,
    width_percent: f64,
    preview: PreviewSize,
) -> (DisplayPoint, DisplaySize) {
    let x = (x_percent / 100.0) * preview.width;
    let y = (y_percent / 100.0) * preview.height;
    let width = (width_percent / 100.0) * preview.width;

    (
        DisplayPoint::new(x, y),
        DisplaySize::new(width, width * ASPECT_RATIO),
    )
}
