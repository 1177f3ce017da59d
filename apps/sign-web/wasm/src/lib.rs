//! WASM bindings for the Sign PDF page
//!
//! Signature/stamp placement state lives in Rust. JavaScript renders the page
//! previews, forwards pointer events and file contents, and draws whatever
//! `getPlacements()` returns.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { SignPdfSession, listPresets } from './pkg/sign_wasm.js';
//!
//! await init();
//!
//! const session = new SignPdfSession("http://localhost:5000");
//! session.loadDocument(bytes);
//! session.setPreviewSize(0, img.clientWidth, img.clientHeight);
//! await session.createTextSignature("Jane Doe");
//! const id = session.addQuickPlacement("bottom-right", "signature", 0);
//!
//! overlay.onpointerdown = (e) => session.pointerDownBody(id, e.clientX, e.clientY);
//! window.onpointermove = (e) => session.pointerMove(e.clientX, e.clientY) && redraw();
//! window.onpointerup = () => session.pointerUp();
//!
//! const signed = await session.exportSigned();
//! downloadBlob(signed, "signed.pdf");
//! ```

pub mod fetch;
pub mod session;

use serde::Serialize;
use sign_core::{PlacementKind, QuickPreset};
use wasm_bindgen::prelude::*;

pub use fetch::FetchSigningService;
pub use session::{PlacementView, SignPdfSession};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Sign PDF WASM initialized".into());
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Quick-placement button data for the toolbar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetInfo {
    pub id: String,
    pub label: &'static str,
    pub x_percent: f64,
    pub y_percent: f64,
    pub width_percent: f64,
}

/// Presets available for `kind`, in toolbar order
pub fn presets_for(kind: PlacementKind) -> Vec<PresetInfo> {
    QuickPreset::ALL
        .iter()
        .map(|preset| {
            let geometry = preset.geometry(kind);
            PresetInfo {
                id: preset.to_string(),
                label: preset.label(),
                x_percent: geometry.x_percent,
                y_percent: geometry.y_percent,
                width_percent: geometry.width_percent,
            }
        })
        .collect()
}

#[wasm_bindgen(js_name = listPresets)]
pub fn list_presets(kind: &str) -> Result<JsValue, JsValue> {
    let kind: PlacementKind = kind.parse().map_err(|e: String| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&presets_for(kind))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
