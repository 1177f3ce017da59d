//! Signature and stamp images
//!
//! The session holds at most one signature asset and one stamp asset.
//! Placements copy the payload when created, so replacing an asset never
//! changes overlays that are already on the page.

use serde::Serialize;
use shared_types::PlacementKind;

use crate::error::SignError;

/// How an asset was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSource {
    /// Rendered remotely from typed text
    Typed,
    /// Read from a user-selected image file
    Uploaded,
    /// Captured from the drawing pad
    Drawn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureAsset {
    data_url: String,
    source: AssetSource,
}

impl SignatureAsset {
    /// Wrap an image data URL (`data:image/...`)
    pub fn new(data_url: impl Into<String>, source: AssetSource) -> Result<Self, SignError> {
        let data_url = data_url.into();
        if !is_image_data_url(&data_url) {
            return Err(SignError::InvalidImage);
        }
        Ok(Self { data_url, source })
    }

    /// Asset from a base64 PNG body without prefix
    pub fn from_png_base64(base64_png: &str, source: AssetSource) -> Result<Self, SignError> {
        if base64_png.trim().is_empty() {
            return Err(SignError::InvalidImage);
        }
        Self::new(png_data_url(base64_png), source)
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn source(&self) -> AssetSource {
        self.source
    }
}

pub fn png_data_url(base64_png: &str) -> String {
    format!("data:image/png;base64,{}", base64_png.trim())
}

fn is_image_data_url(s: &str) -> bool {
    const PREFIX: &str = "data:image/";
    s.len() > PREFIX.len()
        && s.as_bytes()[..PREFIX.len()].eq_ignore_ascii_case(PREFIX.as_bytes())
}

/// The current signature and stamp
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    signature: Option<SignatureAsset>,
    stamp: Option<SignatureAsset>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: PlacementKind, asset: SignatureAsset) {
        *self.slot_mut(kind) = Some(asset);
    }

    pub fn clear(&mut self, kind: PlacementKind) -> Option<SignatureAsset> {
        self.slot_mut(kind).take()
    }

    pub fn get(&self, kind: PlacementKind) -> Option<&SignatureAsset> {
        match kind {
            PlacementKind::Signature => self.signature.as_ref(),
            PlacementKind::Stamp => self.stamp.as_ref(),
        }
    }

    /// Payload to copy into a new placement of `kind`
    pub fn require(&self, kind: PlacementKind) -> Result<&str, SignError> {
        self.get(kind)
            .map(SignatureAsset::data_url)
            .ok_or(SignError::MissingAsset(kind))
    }

    fn slot_mut(&mut self, kind: PlacementKind) -> &mut Option<SignatureAsset> {
        match kind {
            PlacementKind::Signature => &mut self.signature,
            PlacementKind::Stamp => &mut self.stamp,
        }
    }
}

/// Snapshot history of the freehand drawing pad.
///
/// Each finished stroke commits a snapshot of the whole pad. Undo walks back
/// to the previous snapshot but never past the first one.
#[derive(Debug, Clone, Default)]
pub struct DrawingPad {
    history: Vec<String>,
    step: Option<usize>,
}

impl DrawingPad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pad after a stroke; drops any redo tail
    pub fn commit_stroke(&mut self, snapshot: impl Into<String>) {
        let keep = self.step.map_or(0, |s| s + 1);
        self.history.truncate(keep);
        self.history.push(snapshot.into());
        self.step = Some(self.history.len() - 1);
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.step, Some(s) if s > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.step {
            Some(s) => s + 1 < self.history.len(),
            None => false,
        }
    }

    /// Step back one snapshot, returning the snapshot to redraw
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        let step = self.step.map(|s| s - 1)?;
        self.step = Some(step);
        self.history.get(step).map(String::as_str)
    }

    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        let step = self.step.map(|s| s + 1)?;
        self.step = Some(step);
        self.history.get(step).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.step = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.step
            .and_then(|s| self.history.get(s))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
