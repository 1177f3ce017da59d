//! Placement store
//!
//! Ordered collection of signature/stamp overlays for the loaded document.
//! Positions and sizes are kept in display pixels relative to each page's
//! rendered preview. Insertion order is z-order: later entries draw on top.
//!
//! Operations on an unknown id are no-ops. A gesture callback can still be
//! in flight after the placement it targets was removed.

use serde::{Deserialize, Serialize};
use shared_pdf::ASPECT_RATIO;
use shared_types::{DisplayPoint, DisplaySize, PlacementKind};
use tracing::debug;

/// Smallest width a resize may produce, in display pixels
pub const MIN_WIDTH: f64 = 50.0;

/// Height of a placement at [`MIN_WIDTH`]
pub const MIN_HEIGHT: f64 = MIN_WIDTH * ASPECT_RATIO;

/// Stable identifier of a placement, never reused within a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementId(u64);

impl PlacementId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlacementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PlacementId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PlacementId)
    }
}

/// One positioned overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    id: PlacementId,
    page_index: u32,
    kind: PlacementKind,
    position: DisplayPoint,
    size: DisplaySize,
    image_data: String,
}

impl Placement {
    pub fn id(&self) -> PlacementId {
        self.id
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn kind(&self) -> PlacementKind {
        self.kind
    }

    /// Top-left corner in display pixels
    pub fn position(&self) -> DisplayPoint {
        self.position
    }

    pub fn size(&self) -> DisplaySize {
        self.size
    }

    /// Encoded image payload, set at creation
    pub fn image_data(&self) -> &str {
        &self.image_data
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlacementStore {
    next_id: u64,
    placements: Vec<Placement>,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a placement. Height is derived from `size.width` and the aspect lock.
    pub fn add(
        &mut self,
        page_index: u32,
        kind: PlacementKind,
        image_data: impl Into<String>,
        position: DisplayPoint,
        size: DisplaySize,
    ) -> PlacementId {
        let id = PlacementId(self.next_id);
        self.next_id += 1;

        let placement = Placement {
            id,
            page_index,
            kind,
            position,
            size: DisplaySize::new(size.width, size.width * ASPECT_RATIO),
            image_data: image_data.into(),
        };
        debug!(
            "Added {} {} on page {} at ({:.2}, {:.2}) size {:.2}x{:.2}",
            kind, id, page_index, position.x, position.y, placement.size.width, placement.size.height
        );

        self.placements.push(placement);
        id
    }

    /// Remove a placement. Returns false if it was not present.
    pub fn remove(&mut self, id: PlacementId) -> bool {
        if let Some(pos) = self.placements.iter().position(|p| p.id == id) {
            self.placements.remove(pos);
            true
        } else {
            debug!("Remove ignored for unknown placement {}", id);
            false
        }
    }

    /// Move a placement, clamping each axis to be non-negative.
    ///
    /// No page-boundary clamp: overlays may hang past the right or bottom edge.
    pub fn update_position(&mut self, id: PlacementId, position: DisplayPoint) -> bool {
        match self.get_mut(id) {
            Some(placement) => {
                placement.position = DisplayPoint::new(position.x.max(0.0), position.y.max(0.0));
                true
            }
            None => false,
        }
    }

    /// Resize a placement to `new_width` (at least [`MIN_WIDTH`]), height follows the aspect lock
    pub fn update_size(&mut self, id: PlacementId, new_width: f64) -> bool {
        match self.get_mut(id) {
            Some(placement) => {
                let width = new_width.max(MIN_WIDTH);
                placement.size = DisplaySize::new(width, (width * ASPECT_RATIO).max(MIN_HEIGHT));
                true
            }
            None => false,
        }
    }

    /// Rescale every placement on `page_index` after its preview was resized
    pub fn rescale_page(&mut self, page_index: u32, factor_x: f64, factor_y: f64) -> usize {
        let mut count = 0;
        for placement in self
            .placements
            .iter_mut()
            .filter(|p| p.page_index == page_index)
        {
            let width = placement.size.width * factor_x;
            placement.position =
                DisplayPoint::new(placement.position.x * factor_x, placement.position.y * factor_y);
            placement.size = DisplaySize::new(width, width * ASPECT_RATIO);
            count += 1;
        }
        count
    }

    pub fn get(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: PlacementId) -> Option<&mut Placement> {
        let found = self.placements.iter_mut().find(|p| p.id == id);
        if found.is_none() {
            debug!("Update ignored for unknown placement {}", id);
        }
        found
    }

    /// Snapshot in insertion (z) order
    pub fn list(&self) -> &[Placement] {
        &self.placements
    }

    pub fn on_page(&self, page_index: u32) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(move |p| p.page_index == page_index)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Drop every placement. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.placements.clear();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Move(f64, f64),
        Resize(f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-2000.0f64..2000.0, -2000.0f64..2000.0).prop_map(|(x, y)| Op::Move(x, y)),
            (-500.0f64..1500.0).prop_map(Op::Resize),
        ]
    }

    proptest! {
        /// Aspect lock, minimum width and non-negative position hold after any mutation sequence
        #[test]
        fn invariants_hold_after_any_sequence(
            initial_width in 50.0f64..600.0,
            ops in prop::collection::vec(op(), 0..40),
        ) {
            let mut store = PlacementStore::new();
            let id = store.add(
                0,
                PlacementKind::Stamp,
                "data",
                DisplayPoint::new(0.0, 0.0),
                DisplaySize::new(initial_width, 0.0),
            );

            let mut resized = false;
            for op in ops {
                match op {
                    Op::Move(x, y) => { store.update_position(id, DisplayPoint::new(x, y)); }
                    Op::Resize(w) => { store.update_size(id, w); resized = true; }
                }

                let p = store.get(id).unwrap();
                prop_assert!((p.size().height - p.size().width * ASPECT_RATIO).abs() < 1e-9);
                prop_assert!(p.position().x >= 0.0);
                prop_assert!(p.position().y >= 0.0);
                if resized {
                    prop_assert!(p.size().width >= MIN_WIDTH);
                }
            }
        }
    }
}
