//! Placement plans
//!
//! A TOML file listing where signatures and stamps go:
//!
//! ```toml
//! scale_reference = "per-page"
//!
//! [[placements]]
//! kind = "signature"
//! preset = "bottom-right"
//! page = 2
//!
//! [[placements]]
//! kind = "stamp"
//! x_percent = 40.0
//! y_percent = 70.0
//! ```

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use sign_core::presets::default_width_percent;
use sign_core::{PlacementId, PlacementKind, PresetGeometry, QuickPreset, ScaleReference, SignSession};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementPlan {
    /// Leaves the session's reference alone when absent
    #[serde(default)]
    pub scale_reference: Option<ScaleReference>,
    #[serde(default)]
    pub placements: Vec<PlannedPlacement>,
}

/// One entry of a plan. Explicit percentages override the preset's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedPlacement {
    pub kind: PlacementKind,
    #[serde(default)]
    pub preset: Option<QuickPreset>,
    /// Zero-based page index (default: 0)
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub x_percent: Option<f64>,
    #[serde(default)]
    pub y_percent: Option<f64>,
    #[serde(default)]
    pub width_percent: Option<f64>,
}

impl PlannedPlacement {
    pub fn preset(kind: PlacementKind, preset: QuickPreset, page: u32) -> Self {
        Self {
            kind,
            preset: Some(preset),
            page: Some(page),
            x_percent: None,
            y_percent: None,
            width_percent: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn geometry(&self) -> anyhow::Result<PresetGeometry> {
        let base = match self.preset {
            Some(preset) => preset.geometry(self.kind),
            None => {
                let (Some(x), Some(y)) = (self.x_percent, self.y_percent) else {
                    bail!("placement needs either a preset or both x_percent and y_percent");
                };
                PresetGeometry::new(x, y, default_width_percent(self.kind))
            }
        };

        let geometry = PresetGeometry::new(
            self.x_percent.unwrap_or(base.x_percent),
            self.y_percent.unwrap_or(base.y_percent),
            self.width_percent.unwrap_or(base.width_percent),
        );
        if geometry.width_percent.is_nan() || geometry.width_percent <= 0.0 {
            bail!("width_percent must be positive");
        }
        Ok(geometry)
    }
}

impl PlacementPlan {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let plan: Self = toml::from_str(s).context("Failed to parse placement plan")?;
        for (i, placement) in plan.placements.iter().enumerate() {
            placement
                .geometry()
                .with_context(|| format!("placements[{}]", i))?;
        }
        Ok(plan)
    }

    /// Add every planned placement to `session`, in order
    pub fn apply(&self, session: &mut SignSession) -> anyhow::Result<Vec<PlacementId>> {
        if let Some(scale_reference) = self.scale_reference {
            session.set_scale_reference(scale_reference);
        }

        let mut ids = Vec::with_capacity(self.placements.len());
        for (i, placement) in self.placements.iter().enumerate() {
            let geometry = placement.geometry()?;
            let id = session
                .add_percent_placement(placement.kind, placement.page(), geometry)
                .with_context(|| format!("placements[{}]", i))?;
            info!(
                "Placed {} on page {} at ({}%, {}%)",
                placement.kind,
                placement.page() + 1,
                geometry.x_percent,
                geometry.y_percent
            );
            ids.push(id);
        }
        Ok(ids)
    }
}
