//! Request building and response handling for the signing service

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared_types::{
    ApplySignaturesRequest, ApplySignaturesResponse, NativePlacement, TextSignatureRequest,
    TextSignatureResponse,
};
use tracing::{info, warn};

use crate::assets::{AssetSource, SignatureAsset};
use crate::error::SignError;

/// Shown when the service reports failure without a message
const GENERIC_SIGN_FAILURE: &str = "Failed to sign PDF";

pub fn build_apply_request(pdf_bytes: &[u8], placements: Vec<NativePlacement>) -> ApplySignaturesRequest {
    ApplySignaturesRequest {
        pdf_data: STANDARD.encode(pdf_bytes),
        placements,
    }
}

/// Decode the signed document out of an apply-signatures response
pub fn signed_pdf_from_response(response: ApplySignaturesResponse) -> Result<Vec<u8>, SignError> {
    if !response.success {
        let message = response
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| GENERIC_SIGN_FAILURE.to_string());
        warn!("Signing service rejected the request: {}", message);
        return Err(SignError::Service(message));
    }

    let encoded = response
        .signed_pdf
        .ok_or_else(|| SignError::InvalidResponse("missing signed_pdf".to_string()))?;
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| SignError::InvalidResponse(format!("signed_pdf is not base64: {}", e)))?;

    info!("Received signed PDF ({} bytes)", bytes.len());
    Ok(bytes)
}

pub fn text_signature_request(text: &str) -> Result<TextSignatureRequest, SignError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SignError::EmptySignatureText);
    }
    Ok(TextSignatureRequest {
        text: text.to_string(),
    })
}

/// Turn a create-text-signature response into a typed signature asset
pub fn signature_from_response(response: TextSignatureResponse) -> Result<SignatureAsset, SignError> {
    if !response.success {
        let message = response
            .error
            .unwrap_or_else(|| "service reported failure".to_string());
        return Err(SignError::SignatureCreation(message));
    }

    let png = response
        .signature
        .ok_or_else(|| SignError::InvalidResponse("missing signature".to_string()))?;
    SignatureAsset::from_png_base64(&png, AssetSource::Typed)
}
