//! Drag / resize state machine
//!
//! A single gesture is active at a time across the whole document. Pointer
//! coordinates may be in any space (client pixels, page pixels) as long as
//! one gesture uses the same space from pointer-down to pointer-up, since only
//! differences from the anchor are applied.

use serde::Serialize;
use shared_types::{DisplayPoint, DisplaySize};
use tracing::debug;

use crate::store::{PlacementId, PlacementStore, MIN_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GestureState {
    #[default]
    Idle,
    /// Moving a placement; `offset` is pointer minus the placement's top-left at grab time
    Dragging {
        id: PlacementId,
        offset: DisplayPoint,
    },
    /// Resizing from the corner handle
    Resizing {
        id: PlacementId,
        anchor_size: DisplaySize,
        anchor_pointer: DisplayPoint,
    },
}

impl GestureState {
    pub fn target(&self) -> Option<PlacementId> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { id, .. } | GestureState::Resizing { id, .. } => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: GestureState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, GestureState::Idle)
    }

    /// Pointer pressed on a placement body: start dragging it.
    ///
    /// A press while another gesture is active replaces it, since the release
    /// of the previous one was lost. Returns false for an unknown id.
    pub fn pointer_down_body(
        &mut self,
        store: &PlacementStore,
        id: PlacementId,
        pointer: DisplayPoint,
    ) -> bool {
        let Some(placement) = store.get(id) else {
            return false;
        };

        let top_left = placement.position();
        self.state = GestureState::Dragging {
            id,
            offset: DisplayPoint::new(pointer.x - top_left.x, pointer.y - top_left.y),
        };
        debug!("Drag started on placement {}", id);
        true
    }

    /// Pointer pressed on a placement's resize handle: start resizing it
    pub fn pointer_down_handle(
        &mut self,
        store: &PlacementStore,
        id: PlacementId,
        pointer: DisplayPoint,
    ) -> bool {
        let Some(placement) = store.get(id) else {
            return false;
        };

        self.state = GestureState::Resizing {
            id,
            anchor_size: placement.size(),
            anchor_pointer: pointer,
        };
        debug!("Resize started on placement {}", id);
        true
    }

    /// Apply a pointer move to the active gesture. Idle moves are ignored.
    pub fn pointer_move(&mut self, store: &mut PlacementStore, pointer: DisplayPoint) -> bool {
        match self.state {
            GestureState::Idle => false,
            GestureState::Dragging { id, offset } => store.update_position(
                id,
                DisplayPoint::new(pointer.x - offset.x, pointer.y - offset.y),
            ),
            GestureState::Resizing {
                id,
                anchor_size,
                anchor_pointer,
            } => {
                let delta_x = pointer.x - anchor_pointer.x;
                let new_width = (anchor_size.width + delta_x).max(MIN_WIDTH);
                store.update_size(id, new_width)
            }
        }
    }

    /// End the gesture; the last applied state is final
    pub fn pointer_up(&mut self) {
        if let Some(id) = self.state.target() {
            debug!("Gesture ended on placement {}", id);
        }
        self.state = GestureState::Idle;
    }

    /// Leaving the interactive surface ends the gesture exactly like a release
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}
