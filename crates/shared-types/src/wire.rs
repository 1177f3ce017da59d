//! JSON contract of the remote signing service
//!
//! `POST /api/sign/apply-signatures` and `POST /api/sign/create-text-signature`.

use serde::{Deserialize, Serialize};

use crate::types::PlacementKind;

pub const APPLY_SIGNATURES_PATH: &str = "/api/sign/apply-signatures";
pub const CREATE_TEXT_SIGNATURE_PATH: &str = "/api/sign/create-text-signature";

/// One placement in native PDF points, rounded to integers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativePlacement {
    /// Zero-based page index
    pub page: u32,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    /// Image payload, typically a base64 data URL
    pub data: String,
    #[serde(rename = "type")]
    pub kind: PlacementKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplySignaturesRequest {
    /// Base64 of the original PDF bytes
    pub pdf_data: String,
    pub placements: Vec<NativePlacement>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplySignaturesResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSignatureRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSignatureResponse {
    pub success: bool,
    /// Base64 PNG without the data-URL prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_request_shape() {
        let req = ApplySignaturesRequest {
            pdf_data: "JVBERi0=".to_string(),
            placements: vec![NativePlacement {
                page: 0,
                x: 61,
                y: 40,
                width: 122,
                height: 40,
                data: "data:image/png;base64,AAAA".to_string(),
                kind: PlacementKind::Signature,
            }],
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "pdf_data": "JVBERi0=",
                "placements": [{
                    "page": 0,
                    "x": 61,
                    "y": 40,
                    "width": 122,
                    "height": 40,
                    "data": "data:image/png;base64,AAAA",
                    "type": "signature"
                }]
            })
        );
    }

    #[test]
    fn test_failure_response_without_pdf() {
        let resp: ApplySignaturesResponse =
            serde_json::from_str(r#"{"success":false,"error":"Invalid page index"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.signed_pdf, None);
        assert_eq!(resp.error.as_deref(), Some("Invalid page index"));
    }

    #[test]
    fn test_text_signature_response() {
        let resp: TextSignatureResponse =
            serde_json::from_str(r#"{"success":true,"signature":"iVBORw0KGgo="}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.signature.as_deref(), Some("iVBORw0KGgo="));
    }
}
