//! HTTP client for the signing service

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use shared_types::wire::{APPLY_SIGNATURES_PATH, CREATE_TEXT_SIGNATURE_PATH};
use shared_types::{
    ApplySignaturesRequest, ApplySignaturesResponse, TextSignatureRequest, TextSignatureResponse,
};
use sign_core::{SignError, SigningService};
use tracing::debug;

use crate::config::ServiceConfig;

pub struct HttpSigningService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSigningService {
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST JSON and parse the JSON answer, whatever the status code.
    ///
    /// The service reports application errors as `{ success: false, error }`
    /// bodies, sometimes with a 4xx/5xx status.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, String>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        let text = response.text().await.map_err(|e| e.to_string())?;

        match serde_json::from_str(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(format!("HTTP {}", status)),
            Err(e) => Err(format!("Malformed response: {}", e)),
        }
    }
}

#[async_trait(?Send)]
impl SigningService for HttpSigningService {
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
