//! Reading signature/stamp images from disk as data URLs

use anyhow::{bail, Context};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::Path;

/// MIME type for an image file, from its extension
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn image_data_url(path: &Path) -> anyhow::Result<String> {
    let Some(mime) = image_mime(path) else {
        bail!("Unsupported image type: {}", path.display());
    };
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;
    if bytes.is_empty() {
        bail!("Image is empty: {}", path.display());
    }
    Ok(encode_data_url(mime, &bytes))
}
