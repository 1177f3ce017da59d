//! Signing session
//!
//! Everything the Sign PDF page keeps between user actions: the loaded
//! document and its page geometry, the displayed size of each page preview,
//! the signature/stamp assets, the placements and the active gesture.
//! All operations are synchronous except the two calls to the signing
//! service.

use serde::{Deserialize, Serialize};
use shared_pdf::{
    display_to_native, percent_to_display, read_page_descriptors, PageDescriptor, PdfError,
    ScaleFactors,
};
use shared_types::{
    ApplySignaturesRequest, DisplayPoint, DisplaySize, NativePlacement, PlacementKind, PreviewSize,
};
use tracing::{debug, info};

use crate::assets::{AssetLibrary, AssetSource, DrawingPad, SignatureAsset};
use crate::error::SignError;
use crate::export;
use crate::gesture::{GestureState, InteractionController};
use crate::presets::{PresetGeometry, QuickPreset};
use crate::service::SigningService;
use crate::store::{Placement, PlacementId, PlacementStore};

/// Which page preview supplies the display->native scale of a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleReference {
    /// Each placement is scaled against its own page
    #[default]
    PerPage,
    /// Every placement is scaled against page 0, whatever page it is on
    FirstPage,
}

struct LoadedDocument {
    bytes: Vec<u8>,
    pages: Vec<PageDescriptor>,
    previews: Vec<Option<PreviewSize>>,
}

#[derive(Default)]
pub struct SignSession {
    document: Option<LoadedDocument>,
    store: PlacementStore,
    gestures: InteractionController,
    assets: AssetLibrary,
    pad: DrawingPad,
    scale_reference: ScaleReference,
}

impl SignSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale_reference(scale_reference: ScaleReference) -> Self {
        Self {
            scale_reference,
            ..Self::default()
        }
    }

    pub fn scale_reference(&self) -> ScaleReference {
        self.scale_reference
    }

    pub fn set_scale_reference(&mut self, scale_reference: ScaleReference) {
        self.scale_reference = scale_reference;
    }

    // ---- document -------------------------------------------------------

    /// Load a PDF, reading page geometry from the bytes.
    ///
    /// Any previous document, its previews, placements and the active
    /// gesture are discarded. Assets are kept.
    pub fn load_document(&mut self, bytes: Vec<u8>) -> Result<&[PageDescriptor], SignError> {
        let pages = read_page_descriptors(&bytes)?;
        self.load_document_with_pages(bytes, pages)
    }

    /// Load a PDF whose page geometry was already measured by the renderer
    pub fn load_document_with_pages(
        &mut self,
        bytes: Vec<u8>,
        pages: Vec<PageDescriptor>,
    ) -> Result<&[PageDescriptor], SignError> {
        if pages.is_empty() {
            return Err(PdfError::NoPages.into());
        }

        info!("Loaded document: {} bytes, {} pages", bytes.len(), pages.len());
        self.store.clear();
        self.gestures.reset();

        let previews = vec![None; pages.len()];
        let document = self.document.insert(LoadedDocument {
            bytes,
            pages,
            previews,
        });
        Ok(&document.pages)
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn page_count(&self) -> u32 {
        self.document.as_ref().map_or(0, |d| d.pages.len() as u32)
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        self.document.as_ref().map_or(&[], |d| d.pages.as_slice())
    }

    pub fn document_bytes(&self) -> Option<&[u8]> {
        self.document.as_ref().map(|d| d.bytes.as_slice())
    }

    /// Record the displayed size of a page preview.
    ///
    /// When the page already had a preview, its placements are rescaled so
    /// they keep their spot on the page. A zero or non-finite size marks
    /// the preview as not rendered. Returns the number of placements rescaled.
    pub fn set_preview_size(&mut self, page: u32, width: f64, height: f64) -> Result<usize, SignError> {
        let document = self.document.as_mut().ok_or(SignError::NoDocument)?;
        let page_count = document.pages.len() as u32;
        let slot = document
            .previews
            .get_mut(page as usize)
            .ok_or(SignError::PageOutOfRange { page, page_count })?;

        let preview = PreviewSize::new(width, height);
        if !preview.is_usable() {
            debug!("Preview of page {} cleared", page);
            *slot = None;
            return Ok(0);
        }

        let previous = slot.replace(preview);
        match previous {
            Some(old) if old != preview => {
                let fx = preview.width / old.width;
                let fy = preview.height / old.height;
                let count = self.store.rescale_page(page, fx, fy);
                debug!(
                    "Preview of page {} resized to {}x{}, rescaled {} placements",
                    page, width, height, count
                );
                Ok(count)
            }
            _ => Ok(0),
        }
    }

    pub fn preview_size(&self, page: u32) -> Option<PreviewSize> {
        self.document
            .as_ref()
            .and_then(|d| d.previews.get(page as usize).copied().flatten())
    }

    /// Display->native factors used for placements on `page`
    pub fn scale_for(&self, page: u32) -> Result<ScaleFactors, SignError> {
        let document = self.document.as_ref().ok_or(SignError::NoDocument)?;
        let reference = match self.scale_reference {
            ScaleReference::PerPage => page,
            ScaleReference::FirstPage => 0,
        };
        let descriptor = document
            .pages
            .get(reference as usize)
            .ok_or(SignError::PageOutOfRange {
                page: reference,
                page_count: document.pages.len() as u32,
            })?;
        let preview = document
            .previews
            .get(reference as usize)
            .copied()
            .flatten()
            .ok_or(SignError::PreviewNotReady)?;

        ScaleFactors::display_to_native(descriptor.native_width, descriptor.native_height, preview)
            .ok_or(SignError::PreviewNotReady)
    }

    // ---- assets ---------------------------------------------------------

    pub fn set_asset(&mut self, kind: PlacementKind, asset: SignatureAsset) {
        debug!("{} asset set from {:?}", kind.label(), asset.source());
        self.assets.set(kind, asset);
    }

    /// Use an image data URL read from a user-selected file
    pub fn set_uploaded_asset(&mut self, kind: PlacementKind, data_url: &str) -> Result<(), SignError> {
        let asset = SignatureAsset::new(data_url, AssetSource::Uploaded)?;
        self.set_asset(kind, asset);
        Ok(())
    }

    pub fn asset(&self, kind: PlacementKind) -> Option<&SignatureAsset> {
        self.assets.get(kind)
    }

    pub fn clear_asset(&mut self, kind: PlacementKind) {
        self.assets.clear(kind);
    }

    /// Render `text` remotely and make it the signature asset
    pub async fn create_text_signature<S>(&mut self, text: &str, service: &S) -> Result<(), SignError>
    where
        S: SigningService + ?Sized,
    {
        let request = export::text_signature_request(text)?;
        let response = service.create_text_signature(&request).await?;
        let asset = export::signature_from_response(response)?;
        info!("Created text signature for {:?}", request.text);
        self.set_asset(PlacementKind::Signature, asset);
        Ok(())
    }

    // ---- drawing pad ----------------------------------------------------

    pub fn drawing_pad(&self) -> &DrawingPad {
        &self.pad
    }

    pub fn commit_stroke(&mut self, snapshot: impl Into<String>) {
        self.pad.commit_stroke(snapshot);
    }

    pub fn undo_stroke(&mut self) -> Option<&str> {
        self.pad.undo()
    }

    pub fn redo_stroke(&mut self) -> Option<&str> {
        self.pad.redo()
    }

    /// Wipe the pad. A signature that came from the pad is dropped too.
    pub fn clear_drawing(&mut self) {
        self.pad.clear();
        if self
            .assets
            .get(PlacementKind::Signature)
            .is_some_and(|a| a.source() == AssetSource::Drawn)
        {
            self.assets.clear(PlacementKind::Signature);
        }
    }

    /// Make the current pad snapshot the signature asset
    pub fn save_drawing(&mut self) -> Result<(), SignError> {
        let snapshot = self
            .pad
            .current()
            .ok_or(SignError::MissingAsset(PlacementKind::Signature))?;
        let asset = SignatureAsset::new(snapshot, AssetSource::Drawn)?;
        self.set_asset(PlacementKind::Signature, asset);
        Ok(())
    }

    // ---- placements -----------------------------------------------------

    /// Place the current asset of `kind` at a named preset on `page`
    pub fn add_quick_placement(
        &mut self,
        preset: QuickPreset,
        kind: PlacementKind,
        page: u32,
    ) -> Result<PlacementId, SignError> {
        self.add_percent_placement(kind, page, preset.geometry(kind))
    }

    /// Place the current asset of `kind` at percentages of the displayed page
    pub fn add_percent_placement(
        &mut self,
        kind: PlacementKind,
        page: u32,
        geometry: PresetGeometry,
    ) -> Result<PlacementId, SignError> {
        let preview = self.check_placeable(kind, page)?;
        if !(geometry.x_percent.is_finite() && geometry.y_percent.is_finite()) {
            return Err(SignError::InvalidGeometry("position must be a finite number"));
        }
        check_width(geometry.width_percent)?;
        let (position, size) = percent_to_display(
            geometry.x_percent,
            geometry.y_percent,
            geometry.width_percent,
            preview,
        );
        self.push_placement(kind, page, position, size)
    }

    /// Place the current asset of `kind` at a display position with a display width
    pub fn add_placement(
        &mut self,
        kind: PlacementKind,
        page: u32,
        position: DisplayPoint,
        width: f64,
    ) -> Result<PlacementId, SignError> {
        self.check_placeable(kind, page)?;
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(SignError::InvalidGeometry("position must be a finite number"));
        }
        check_width(width)?;
        self.push_placement(
            kind,
            page,
            DisplayPoint::new(position.x.max(0.0), position.y.max(0.0)),
            DisplaySize::new(width, 0.0),
        )
    }

    /// Preconditions shared by every placement entry point, checked before
    /// anything is mutated. Returns the preview of `page`.
    fn check_placeable(&self, kind: PlacementKind, page: u32) -> Result<PreviewSize, SignError> {
        self.assets.require(kind)?;
        let document = self.document.as_ref().ok_or(SignError::NoDocument)?;
        let page_count = document.pages.len() as u32;
        if page >= page_count {
            return Err(SignError::PageOutOfRange { page, page_count });
        }
        self.preview_size(page).ok_or(SignError::PreviewNotReady)
    }

    fn push_placement(
        &mut self,
        kind: PlacementKind,
        page: u32,
        position: DisplayPoint,
        size: DisplaySize,
    ) -> Result<PlacementId, SignError> {
        let data = self.assets.require(kind)?.to_string();
        Ok(self.store.add(page, kind, data, position, size))
    }

    /// Remove a placement. Unknown ids are ignored.
    pub fn remove_placement(&mut self, id: PlacementId) -> bool {
        if self.gestures.state().target() == Some(id) {
            self.gestures.reset();
        }
        self.store.remove(id)
    }

    pub fn placements(&self) -> &[Placement] {
        self.store.list()
    }

    pub fn placement(&self, id: PlacementId) -> Option<&Placement> {
        self.store.get(id)
    }

    pub fn placements_on_page(&self, page: u32) -> impl Iterator<Item = &Placement> {
        self.store.on_page(page)
    }

    // ---- gestures -------------------------------------------------------

    pub fn pointer_down_body(&mut self, id: PlacementId, pointer: DisplayPoint) -> bool {
        self.gestures.pointer_down_body(&self.store, id, pointer)
    }

    pub fn pointer_down_handle(&mut self, id: PlacementId, pointer: DisplayPoint) -> bool {
        self.gestures.pointer_down_handle(&self.store, id, pointer)
    }

    pub fn pointer_move(&mut self, pointer: DisplayPoint) -> bool {
        self.gestures.pointer_move(&mut self.store, pointer)
    }

    pub fn pointer_up(&mut self) {
        self.gestures.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.gestures.pointer_leave();
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    // ---- export ---------------------------------------------------------

    /// Every placement converted to rounded native points, in z-order
    pub fn native_placements(&self) -> Result<Vec<NativePlacement>, SignError> {
        self.store
            .list()
            .iter()
            .map(|placement| {
                let scale = self.scale_for(placement.page_index())?;
                let rect = display_to_native(placement.position(), placement.size(), scale);
                let (x, y, width, height) = rect.rounded();
                debug!(
                    "Placement {} page {}: display ({:.2}, {:.2}) -> native ({}, {}) {}x{}",
                    placement.id(),
                    placement.page_index(),
                    placement.position().x,
                    placement.position().y,
                    x,
                    y,
                    width,
                    height
                );
                Ok(NativePlacement {
                    page: placement.page_index(),
                    x,
                    y,
                    width,
                    height,
                    data: placement.image_data().to_string(),
                    kind: placement.kind(),
                })
            })
            .collect()
    }

    /// The apply-signatures request for the current state
    pub fn export_request(&self) -> Result<ApplySignaturesRequest, SignError> {
        let document = match &self.document {
            Some(document) if !self.store.is_empty() => document,
            _ => return Err(SignError::NothingToExport),
        };
        let placements = self.native_placements()?;
        Ok(export::build_apply_request(&document.bytes, placements))
    }

    /// Send the document and placements to the signing service and return the signed PDF.
    ///
    /// The session is left untouched whatever the outcome.
    pub async fn export<S>(&self, service: &S) -> Result<Vec<u8>, SignError>
    where
        S: SigningService + ?Sized,
    {
        let request = self.export_request()?;
        info!(
            "Exporting {} placements across {} pages",
            request.placements.len(),
            self.page_count()
        );
        let response = service.apply_signatures(&request).await?;
        export::signed_pdf_from_response(response)
    }
}

fn check_width(width: f64) -> Result<(), SignError> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(SignError::InvalidGeometry("width must be a positive number"))
    }
}
