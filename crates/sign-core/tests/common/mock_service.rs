//! Scripted signing service that records what it was sent

use std::cell::RefCell;

use async_trait::async_trait;
use sign_core::{SignError, SigningService};
use shared_types::{
    ApplySignaturesRequest, ApplySignaturesResponse, TextSignatureRequest, TextSignatureResponse,
};

pub struct MockService {
    pub apply_response: Result<ApplySignaturesResponse, SignError>,
    pub text_response: Result<TextSignatureResponse, SignError>,
    pub apply_requests: RefCell<Vec<ApplySignaturesRequest>>,
    pub text_requests: RefCell<Vec<TextSignatureRequest>>,
}

impl MockService {
    /// Answers every apply call with `signed_pdf` (already base64)
    pub fn signing(signed_pdf: &str) -> Self {
        Self {
            apply_response: Ok(ApplySignaturesResponse {
                success: true,
                signed_pdf: Some(signed_pdf.to_string()),
                error: None,
            }),
            text_response: Ok(TextSignatureResponse {
                success: true,
                signature: Some("iVBORw0KGgo=".to_string()),
                error: None,
            }),
            apply_requests: RefCell::new(Vec::new()),
            text_requests: RefCell::new(Vec::new()),
        }
    }

    pub fn rejecting(error: Option<&str>) -> Self {
        Self {
            apply_response: Ok(ApplySignaturesResponse {
                success: false,
                signed_pdf: None,
                error: error.map(str::to_string),
            }),
            ..Self::signing("")
        }
    }

    pub fn unreachable() -> Self {
        Self {
            apply_response: Err(SignError::Transport("connection refused".to_string())),
            text_response: Err(SignError::SignatureCreation("connection refused".to_string())),
            ..Self::signing("")
        }
    }
}

#[async_trait(?Send)]
impl SigningService for MockService {
    async fn apply_signatures(
        &self,
        request: &ApplySignaturesRequest,
    ) -> Result<ApplySignaturesResponse, SignError> {
        self.apply_requests.borrow_mut().push(request.clone());
        self.apply_response.clone()
    }

    async fn create_text_signature(
        &self,
        request: &TextSignatureRequest,
    ) -> Result<TextSignatureResponse, SignError> {
        self.text_requests.borrow_mut().push(request.clone());
        self.text_response.clone()
    }
}
