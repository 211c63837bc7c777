// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured vote-extension metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn vote_ext_metrics() -> &'static dyn VoteExtMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns a static reference to the configured bridge metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn bridge_metrics() -> &'static dyn BridgeMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

// --- Trait Definitions ---

/// A sink for metrics related to the per-height vote-extension callbacks.
pub trait VoteExtMetricsSink: Send + Sync + std::fmt::Debug {
    /// Counts a peer extension verdict; `outcome` is `"accept"` or a reject label.
    fn inc_vote_ext_verified(&self, outcome: &'static str);
    /// Counts a proposal verdict; `outcome` is `"accept"` or a reject label.
    fn inc_proposal_verdict(&self, outcome: &'static str);
    /// Observes the latency of one callback, labeled by callback name.
    fn observe_callback_duration(&self, callback: &'static str, duration_secs: f64);
    /// Sets the gauge for votes cached for the height being assembled.
    fn set_cached_votes(&self, count: usize);
    /// Increments the counter of vote-extension records written at pre-finalize.
    fn inc_votes_persisted(&self, count: u64);
}
impl VoteExtMetricsSink for NopSink {
    fn inc_vote_ext_verified(&self, _outcome: &'static str) {}
    fn inc_proposal_verdict(&self, _outcome: &'static str) {}
    fn observe_callback_duration(&self, _callback: &'static str, _duration_secs: f64) {}
    fn set_cached_votes(&self, _count: usize) {}
    fn inc_votes_persisted(&self, _count: u64) {}
}

/// A sink for metrics related to bridge action resolution.
pub trait BridgeMetricsSink: Send + Sync + std::fmt::Debug {
    /// Counts a processed action, labeled by action type.
    fn inc_actions_processed(&self, action_type: &'static str);
    /// Counts an approved action, labeled by action type.
    fn inc_actions_approved(&self, action_type: &'static str);
    /// Counts an ignored action, labeled by the business rule that ignored it.
    fn inc_actions_ignored(&self, reason: &'static str);
    /// Observes the latency of one verifier round-trip.
    fn observe_verifier_latency(&self, duration_secs: f64);
    /// Counts a failed verifier round-trip.
    fn inc_verifier_failures(&self);
    /// Counts a successful `LockForWithdrawal`.
    fn inc_withdrawals_locked(&self);
}
impl BridgeMetricsSink for NopSink {
    fn inc_actions_processed(&self, _action_type: &'static str) {}
    fn inc_actions_approved(&self, _action_type: &'static str) {}
    fn inc_actions_ignored(&self, _reason: &'static str) {}
    fn observe_verifier_latency(&self, _duration_secs: f64) {}
    fn inc_verifier_failures(&self) {}
    fn inc_withdrawals_locked(&self) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and variant.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: VoteExtMetricsSink + BridgeMetricsSink + ErrorMetricsSink {}

// Blanket implementation to allow any type that implements all sub-traits
// to be used as a `MetricsSink`.
impl<T> MetricsSink for T where T: VoteExtMetricsSink + BridgeMetricsSink + ErrorMetricsSink {}
