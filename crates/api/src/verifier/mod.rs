// Path: crates/api/src/verifier/mod.rs

//! Defines the `ActionVerifier` trait for the external co-signer service.

use async_trait::async_trait;
use pulsar_types::app::Action;
use pulsar_types::error::VerifierError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The request body sent to the verifier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerifyActionsRequest {
    /// The submitted batch, in order.
    pub actions: Vec<Action>,
    /// Each referenced foreign key's current withdrawal balance, as a decimal string.
    pub balances: BTreeMap<String, String>,
    /// The merkle witness supplied by the prover.
    pub witness: String,
    /// The currently settled attested-chain height.
    pub settled_height: u64,
    /// The height the batch settles up to.
    pub next_height: u64,
}

/// The verifier's answer: one flag per submitted action.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerifyActionsResponse {
    /// `mask[i]` says whether `actions[i]` may be processed.
    pub mask: Vec<bool>,
}

/// Checks a batch of actions against the attested chain.
#[async_trait]
pub trait ActionVerifier: Send + Sync {
    /// Returns the per-action mask. Any error aborts the enclosing call.
    async fn verify(&self, request: &VerifyActionsRequest) -> Result<Vec<bool>, VerifierError>;
}

#[async_trait]
impl<T: ActionVerifier + ?Sized> ActionVerifier for std::sync::Arc<T> {
    async fn verify(&self, request: &VerifyActionsRequest) -> Result<Vec<bool>, VerifierError> {
        (**self).verify(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_types::app::ActionType;

    #[test]
    fn request_uses_snake_case_heights() {
        let req = VerifyActionsRequest {
            actions: vec![Action {
                public_key: "B62q".into(),
                amount: 5,
                action_type: ActionType::Settlement,
                block_height: 1,
                local_address: "c".into(),
                local_signature: vec![1],
            }],
            balances: BTreeMap::from([("B62q".to_string(), "0".to_string())]),
            witness: "w".into(),
            settled_height: 3,
            next_height: 4,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["settled_height"], 3);
        assert_eq!(json["next_height"], 4);
        assert_eq!(json["balances"]["B62q"], "0");
        assert_eq!(json["actions"][0]["actionType"], "settlement");

        let resp: VerifyActionsResponse =
            serde_json::from_str(r#"{"mask":[true,false]}"#).unwrap();
        assert_eq!(resp.mask, vec![true, false]);
    }
}
