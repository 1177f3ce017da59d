//! Stateful signing session for the Sign PDF page
//!
//! Holds the document, assets, placements and gesture state in Rust. The
//! page renders previews, forwards pointer events and reports preview sizes.
//! Placement ids cross the boundary as strings.

use serde::Serialize;
use sign_core::{
    DisplayPoint, PlacementId, PlacementKind, PresetGeometry, QuickPreset, ScaleReference,
    SignError, SignSession,
};
use wasm_bindgen::prelude::*;

use crate::fetch::{FetchSigningService, DEFAULT_API_BASE};

/// Placement as seen by JavaScript
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementView {
    pub id: String,
    pub page_index: u32,
    #[serde(rename = "type")]
    pub kind: PlacementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub image_data: String,
}

#[wasm_bindgen]
pub struct SignPdfSession {
    inner: SignSession,
    service: FetchSigningService,
}

#[wasm_bindgen]
impl SignPdfSession {
    /// Create a session talking to the signing service at `api_base`
    #[wasm_bindgen(constructor)]
    pub fn new(api_base: Option<String>) -> Self {
        let api_base = api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self {
            inner: SignSession::new(),
            service: FetchSigningService::new(&api_base),
        }
    }

    #[wasm_bindgen(getter, js_name = apiBase)]
    pub fn api_base(&self) -> String {
        self.service.api_base().to_string()
    }

    /// "per-page" (default) or "first-page"
    #[wasm_bindgen(js_name = setScaleReference)]
    pub fn set_scale_reference(&mut self, reference: &str) -> Result<(), JsValue> {
        let reference = parse_scale_reference(reference).map_err(|e| JsValue::from_str(&e))?;
        self.inner.set_scale_reference(reference);
        Ok(())
    }

    // ---- document -------------------------------------------------------

    /// Load PDF bytes; returns the page descriptors
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let pages = self.inner.load_document(bytes.to_vec()).map_err(to_js)?;
        web_sys::console::log_1(&format!("Loaded PDF with {} pages", pages.len()).into());
        to_js_value(&pages)
    }

    #[wasm_bindgen(js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> u32 {
        self.inner.page_count()
    }

    /// Report the rendered size of a page preview; returns how many placements were rescaled
    #[wasm_bindgen(js_name = setPreviewSize)]
    pub fn set_preview_size(&mut self, page: u32, width: f64, height: f64) -> Result<usize, JsValue> {
        self.inner.set_preview_size(page, width, height).map_err(to_js)
    }

    // ---- assets ---------------------------------------------------------

    /// Use an image data URL from the file reader as the signature or stamp
    #[wasm_bindgen(js_name = setUploadedAsset)]
    pub fn set_uploaded_asset(&mut self, kind: &str, data_url: &str) -> Result<(), JsValue> {
        self.set_uploaded_asset_internal(kind, data_url)
            .map_err(|e| JsValue::from_str(&e))
    }

    fn set_uploaded_asset_internal(&mut self, kind: &str, data_url: &str) -> Result<(), String> {
        let kind = parse_kind(kind)?;
        self.inner
            .set_uploaded_asset(kind, data_url)
            .map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = hasAsset)]
    pub fn has_asset(&self, kind: &str) -> bool {
        parse_kind(kind).is_ok_and(|k| self.inner.asset(k).is_some())
    }

    /// Asset image data URL, if any
    #[wasm_bindgen(js_name = getAsset)]
    pub fn get_asset(&self, kind: &str) -> Option<String> {
        let kind = parse_kind(kind).ok()?;
        self.inner.asset(kind).map(|a| a.data_url().to_string())
    }

    /// Render typed text remotely and use it as the signature
    #[wasm_bindgen(js_name = createTextSignature)]
    pub async fn create_text_signature(&mut self, text: String) -> Result<String, JsValue> {
        self.inner
            .create_text_signature(&text, &self.service)
            .await
            .map_err(to_js)?;
        Ok(self.get_asset("signature").unwrap_or_default())
    }

    // ---- drawing pad ----------------------------------------------------

    /// Record the canvas after a finished stroke
    #[wasm_bindgen(js_name = commitStroke)]
    pub fn commit_stroke(&mut self, snapshot: &str) {
        self.inner.commit_stroke(snapshot);
    }

    /// Returns the snapshot to redraw, or undefined when nothing to undo
    #[wasm_bindgen(js_name = undoStroke)]
    pub fn undo_stroke(&mut self) -> Option<String> {
        self.inner.undo_stroke().map(str::to_string)
    }

    #[wasm_bindgen(js_name = redoStroke)]
    pub fn redo_stroke(&mut self) -> Option<String> {
        self.inner.redo_stroke().map(str::to_string)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.drawing_pad().can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.drawing_pad().can_redo()
    }

    #[wasm_bindgen(js_name = clearDrawing)]
    pub fn clear_drawing(&mut self) {
        self.inner.clear_drawing();
    }

    #[wasm_bindgen(js_name = saveDrawing)]
    pub fn save_drawing(&mut self) -> Result<(), JsValue> {
        self.inner.save_drawing().map_err(to_js)
    }

    // ---- placements -----------------------------------------------------

    /// Place at a named preset such as "bottom-right"; returns the new id
    #[wasm_bindgen(js_name = addQuickPlacement)]
    pub fn add_quick_placement(&mut self, preset: &str, kind: &str, page: Option<u32>) -> Result<String, JsValue> {
        self.add_quick_placement_internal(preset, kind, page.unwrap_or(0))
            .map_err(|e| JsValue::from_str(&e))
    }

    fn add_quick_placement_internal(&mut self, preset: &str, kind: &str, page: u32) -> Result<String, String> {
        let preset: QuickPreset = preset.parse()?;
        let kind = parse_kind(kind)?;
        self.inner
            .add_quick_placement(preset, kind, page)
            .map(|id| id.to_string())
            .map_err(|e| e.to_string())
    }

    /// Place at explicit percentages of the displayed page
    #[wasm_bindgen(js_name = addPercentPlacement)]
    pub fn add_percent_placement(
        &mut self,
        kind: &str,
        page: u32,
        x_percent: f64,
        y_percent: f64,
        width_percent: f64,
    ) -> Result<String, JsValue> {
        let kind = parse_kind(kind).map_err(|e| JsValue::from_str(&e))?;
        self.inner
            .add_percent_placement(kind, page, PresetGeometry::new(x_percent, y_percent, width_percent))
            .map(|id| id.to_string())
            .map_err(to_js)
    }

    /// Place at a display position (e.g. where the user clicked)
    #[wasm_bindgen(js_name = addPlacementAt)]
    pub fn add_placement_at(&mut self, kind: &str, page: u32, x: f64, y: f64, width: f64) -> Result<String, JsValue> {
        let kind = parse_kind(kind).map_err(|e| JsValue::from_str(&e))?;
        self.inner
            .add_placement(kind, page, DisplayPoint::new(x, y), width)
            .map(|id| id.to_string())
            .map_err(to_js)
    }

    /// Unknown or malformed ids are ignored
    #[wasm_bindgen(js_name = removePlacement)]
    pub fn remove_placement(&mut self, id: &str) -> bool {
        match parse_id(id) {
            Some(id) => self.inner.remove_placement(id),
            None => false,
        }
    }

    #[wasm_bindgen(js_name = getPlacements)]
    pub fn get_placements(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.placement_views(None))
    }

    #[wasm_bindgen(js_name = getPagePlacements)]
    pub fn get_page_placements(&self, page: u32) -> Result<JsValue, JsValue> {
        to_js_value(&self.placement_views(Some(page)))
    }

    fn placement_views(&self, page: Option<u32>) -> Vec<PlacementView> {
        self.inner
            .placements()
            .iter()
            .filter(|p| page.map_or(true, |page| p.page_index() == page))
            .map(|p| PlacementView {
                id: p.id().to_string(),
                page_index: p.page_index(),
                kind: p.kind(),
                x: p.position().x,
                y: p.position().y,
                width: p.size().width,
                height: p.size().height,
                image_data: p.image_data().to_string(),
            })
            .collect()
    }

    // ---- pointer events -------------------------------------------------

    #[wasm_bindgen(js_name = pointerDownBody)]
    pub fn pointer_down_body(&mut self, id: &str, x: f64, y: f64) -> bool {
        parse_id(id).is_some_and(|id| self.inner.pointer_down_body(id, DisplayPoint::new(x, y)))
    }

    #[wasm_bindgen(js_name = pointerDownHandle)]
    pub fn pointer_down_handle(&mut self, id: &str, x: f64, y: f64) -> bool {
        parse_id(id).is_some_and(|id| self.inner.pointer_down_handle(id, DisplayPoint::new(x, y)))
    }

    /// Returns true when a placement changed and should be redrawn
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(DisplayPoint::new(x, y))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.inner.pointer_leave();
    }

    #[wasm_bindgen(js_name = getGestureState)]
    pub fn get_gesture_state(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.gesture_state())
    }

    // ---- export ---------------------------------------------------------

    /// Placements converted to PDF points, as they would be sent
    #[wasm_bindgen(js_name = getNativePlacements)]
    pub fn get_native_placements(&self) -> Result<JsValue, JsValue> {
        let placements = self.inner.native_placements().map_err(to_js)?;
        to_js_value(&placements)
    }

    /// Send everything to the signing service; resolves to the signed PDF bytes
    #[wasm_bindgen(js_name = exportSigned)]
    pub async fn export_signed(&self) -> Result<js_sys::Uint8Array, JsValue> {
        let signed = self.inner.export(&self.service).await.map_err(to_js)?;
        web_sys::console::log_1(&format!("Signed PDF ready ({} bytes)", signed.len()).into());

        let array = js_sys::Uint8Array::new_with_length(signed.len() as u32);
        array.copy_from(&signed);
        Ok(array)
    }
}

fn parse_kind(kind: &str) -> Result<PlacementKind, String> {
    kind.parse()
}

fn parse_id(id: &str) -> Option<PlacementId> {
    id.parse().ok()
}

fn parse_scale_reference(reference: &str) -> Result<ScaleReference, String> {
    match reference.trim().to_ascii_lowercase().as_str() {
        "per-page" | "perpage" => Ok(ScaleReference::PerPage),
        "first-page" | "firstpage" => Ok(ScaleReference::FirstPage),
        other => Err(format!("Unknown scale reference: {}", other)),
    }
}

fn to_js(err: SignError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}


// Browser-only tests for the JsValue surface
#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use sign_core::PageDescriptor;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn ready_session() -> SignPdfSession {
        let mut session = SignPdfSession::new(None);
        session
            .inner
            .load_document_with_pages(b"%PDF-1.7".to_vec(), vec![PageDescriptor::new(0, 612.0, 792.0)])
            .unwrap();
        session.set_preview_size(0, 1000.0, 800.0).unwrap();
        session
    }

    #[wasm_bindgen_test]
    fn test_rejects_non_ascii_upload() {
        let mut session = ready_session();
        let err = session
            .set_uploaded_asset("signature", "data:imageé/png;base64,AA")
            .unwrap_err();
        assert_eq!(err.as_string().unwrap(), SignError::InvalidImage.to_string());
        assert!(!session.has_asset("signature"));
    }

    #[wasm_bindgen_test]
    fn test_add_placement_at_rejects_nan_width() {
        let mut session = ready_session();
        session
            .set_uploaded_asset("signature", "data:image/png;base64,U0lH")
            .unwrap();
        assert!(session.add_placement_at("signature", 0, 10.0, 10.0, f64::NAN).is_err());

        let id = session.add_placement_at("signature", 0, 10.0, 10.0, 200.0).unwrap();
        assert!(id.parse::<u64>().is_ok());
        let placements = js_sys::Array::from(&session.get_placements().unwrap());
        assert_eq!(placements.length(), 1);
    }
}
