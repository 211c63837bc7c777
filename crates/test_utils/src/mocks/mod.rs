// Path: crates/test_utils/src/mocks/mod.rs
//! In-process stand-ins for the collaborators the validator core talks to.

mod ledger;
mod registry;
mod validators;
mod verifier;

pub use ledger::MockLedger;
pub use registry::MockRegistry;
pub use validators::MockValidatorSource;
pub use verifier::MockVerifier;
