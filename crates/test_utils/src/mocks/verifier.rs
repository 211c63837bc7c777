// Path: crates/test_utils/src/mocks/verifier.rs
use async_trait::async_trait;
use parking_lot::Mutex;
use pulsar_api::verifier::{ActionVerifier, VerifyActionsRequest};
use pulsar_types::error::VerifierError;
use std::collections::VecDeque;

/// A scripted action verifier.
///
/// Queued responses are returned in order; once the queue is empty every
/// action is approved. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockVerifier {
    responses: Mutex<VecDeque<Result<Vec<bool>, VerifierError>>>,
    requests: Mutex<Vec<VerifyActionsRequest>>,
}

impl MockVerifier {
    /// A verifier that approves everything.
    pub fn approve_all() -> Self {
        Self::default()
    }

    /// Queues a mask for the next call.
    pub fn push_mask(&self, mask: Vec<bool>) {
        self.responses.lock().push_back(Ok(mask));
    }

    /// Queues a failure for the next call.
    pub fn push_error(&self, error: VerifierError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<VerifyActionsRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ActionVerifier for MockVerifier {
    async fn verify(&self, request: &VerifyActionsRequest) -> Result<Vec<bool>, VerifierError> {
        self.requests.lock().push(request.clone());
        match self.responses.lock().pop_front() {
            Some(response) => response,
            None => Ok(vec![true; request.actions.len()]),
        }
    }
}
