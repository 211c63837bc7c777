// Path: crates/services/src/verifier/mod.rs
//! HTTP client for the external action verifier.
//!
//! The verifier co-signs batches: it receives the actions, the withdrawal
//! balances they touch and the merkle witness, and answers with one boolean
//! per action.

use async_trait::async_trait;
use pulsar_api::verifier::{ActionVerifier, VerifyActionsRequest};
use pulsar_types::config::VerifierConfig;
use pulsar_types::error::VerifierError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// The verifier's answer. Older signer nodes reply with a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum MaskBody {
    Wrapped { mask: Vec<bool> },
    Bare(Vec<bool>),
}

impl MaskBody {
    fn into_mask(self) -> Vec<bool> {
        match self {
            MaskBody::Wrapped { mask } | MaskBody::Bare(mask) => mask,
        }
    }
}

/// POSTs batches to `{base_url}/sign`.
#[derive(Debug, Clone)]
pub struct HttpActionVerifier {
    client: Client,
    endpoint: String,
}

impl HttpActionVerifier {
    pub fn new(config: &VerifierConfig) -> Result<Self, VerifierError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| VerifierError::Setup(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/sign", config.base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ActionVerifier for HttpActionVerifier {
    async fn verify(&self, request: &VerifyActionsRequest) -> Result<Vec<bool>, VerifierError> {
        debug!(
            target: "verifier",
            endpoint = %self.endpoint,
            actions = request.actions.len(),
            settled_height = request.settled_height,
            next_height = request.next_height,
            "verifying action batch"
        );
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| VerifierError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VerifierError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(VerifierError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: MaskBody =
            serde_json::from_str(&body).map_err(|e| VerifierError::Decode(e.to_string()))?;
        Ok(parsed.into_mask())
    }
}
