use shared_pdf::PdfError;
use shared_types::PlacementKind;
use thiserror::Error;

/// Errors surfaced to the user by the placement engine.
///
/// The `Display` text of every variant is the notification shown in the UI.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignError {
    #[error("Please upload a PDF first")]
    NoDocument,

    #[error("Please {} first", missing_asset_hint(.0))]
    MissingAsset(PlacementKind),

    #[error("PDF preview not ready")]
    PreviewNotReady,

    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("Please add at least one signature")]
    NothingToExport,

    #[error("Please enter your name")]
    EmptySignatureText,

    #[error("Unsupported image data: expected an image data URL")]
    InvalidImage,

    #[error("Invalid placement geometry: {0}")]
    InvalidGeometry(&'static str),

    /// Non-success answer from the signing service, shown verbatim
    #[error("{0}")]
    Service(String),

    #[error("Failed to sign PDF: {0}")]
    Transport(String),

    #[error("Failed to create signature: {0}")]
    SignatureCreation(String),

    #[error("Invalid response from signing service: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Pdf(#[from] PdfError),
}

impl SignError {
    /// True for errors detected before any state was touched
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SignError::NoDocument
                | SignError::MissingAsset(_)
                | SignError::PreviewNotReady
                | SignError::PageOutOfRange { .. }
                | SignError::NothingToExport
                | SignError::EmptySignatureText
                | SignError::InvalidImage
                | SignError::InvalidGeometry(_)
        )
    }
}

fn missing_asset_hint(kind: &PlacementKind) -> &'static str {
    match kind {
        PlacementKind::Signature => "create signature",
        PlacementKind::Stamp => "upload stamp",
    }
}
