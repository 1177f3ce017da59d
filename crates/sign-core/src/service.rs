//! Seam to the remote signing service
//!
//! The browser talks to it through `fetch`, the CLI through `reqwest`, and
//! tests through an in-memory mock. Futures are not `Send` so the browser
//! implementation can hold `JsValue`s across awaits.

use async_trait::async_trait;
use shared_types::{
    ApplySignaturesRequest, ApplySignaturesResponse, TextSignatureRequest, TextSignatureResponse,
};

use crate::error::SignError;

#[async_trait(?Send)]
pub trait SigningService {
    /// `POST /api/sign/apply-signatures`
    ///
    /// Transport failures map to [`SignError::Transport`]. A well-formed
    /// response with `success: false` is returned as `Ok`.
    async fn apply_signatures(
        &self,
        request: &ApplySignaturesRequest,
    ) -> Result<ApplySignaturesResponse, SignError>;

    /// `POST /api/sign/create-text-signature`
    async fn create_text_signature(
        &self,
        request: &TextSignatureRequest,
    ) -> Result<TextSignatureResponse, SignError>;
}
