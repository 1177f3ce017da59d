//! Types shared between the placement engine, the browser façade and the CLI.

pub mod types;
pub mod wire;

pub use types::{DisplayPoint, DisplaySize, PlacementKind, PreviewSize};
pub use wire::{
    ApplySignaturesRequest, ApplySignaturesResponse, NativePlacement, TextSignatureRequest,
    TextSignatureResponse,
};
