//! Signature and stamp placement engine
//!
//! Keeps track of where signature/stamp images sit on the rendered preview
//! of a PDF, lets the user drag and resize them, and converts their
//! positions to PDF points for the remote signing service.
//!
//! [`SignSession`] ties the pieces together for the browser page and the CLI.

pub mod assets;
pub mod error;
pub mod export;
pub mod gesture;
pub mod presets;
pub mod service;
pub mod session;
pub mod store;

pub use assets::{AssetLibrary, AssetSource, DrawingPad, SignatureAsset};
pub use error::SignError;
pub use gesture::{GestureState, InteractionController};
pub use presets::{PresetGeometry, QuickPreset};
pub use service::SigningService;
pub use session::{ScaleReference, SignSession};
pub use store::{Placement, PlacementId, PlacementStore, MIN_HEIGHT, MIN_WIDTH};

// Re-export shared types used throughout the public API
pub use shared_pdf::{PageDescriptor, ScaleFactors, ASPECT_RATIO};
pub use shared_types::{DisplayPoint, DisplaySize, PlacementKind, PreviewSize};
