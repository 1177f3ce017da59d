//! Signing service reached through the browser's `fetch`

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use shared_types::wire::{APPLY_SIGNATURES_PATH, CREATE_TEXT_SIGNATURE_PATH};
use shared_types::{
    ApplySignaturesRequest, ApplySignaturesResponse, TextSignatureRequest, TextSignatureResponse,
};
use sign_core::{SignError, SigningService};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

pub struct FetchSigningService {
    api_base: String,
}

impl FetchSigningService {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: normalize_base(api_base),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// POST `body` as JSON and parse the JSON answer.
    ///
    /// Error statuses still carry a `{ success, error }` body, so the body is
    /// parsed whatever the status and the status only reported if parsing fails.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, String>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.api_base, path);
        let body = serde_json::to_string(body).map_err(|e| e.to_string())?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;

        let window = web_sys::window().ok_or("No window")?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?;
        let response: Response = response.dyn_into().map_err(js_error)?;

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();

        match serde_json::from_str(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !response.ok() => Err(format!("HTTP {}", response.status())),
            Err(e) => Err(format!("Malformed response: {}", e)),
        }
    }
}

#[async_trait(?Send)]
impl SigningService for FetchSigningService {
    async fn apply_signatures(
        &self,
        request: &ApplySignaturesRequest,
    ) -> Result<ApplySignaturesResponse, SignError> {
        self.post_json(APPLY_SIGNATURES_PATH, request)
            .await
            .map_err(SignError::Transport)
    }

    async fn create_text_signature(
        &self,
        request: &TextSignatureRequest,
    ) -> Result<TextSignatureResponse, SignError> {
        self.post_json(CREATE_TEXT_SIGNATURE_PATH, request)
            .await
            .map_err(SignError::SignatureCreation)
    }
}

fn normalize_base(api_base: &str) -> String {
    let trimmed = api_base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE.to_string()
    } else {
        trimmed.to_string()
    }
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("https://api.example.com/"), "https://api.example.com");
        assert_eq!(normalize_base("  "), DEFAULT_API_BASE);
        assert_eq!(normalize_base("http://localhost:5000"), "http://localhost:5000");
    }
}
