// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_histogram_vec, register_int_counter,
    register_int_counter_vec, register_int_gauge, Histogram, HistogramVec, IntCounter,
    IntCounterVec, IntGauge,
};

// --- Metric Statics ---
// We use OnceCell to hold the metric collectors. They will be initialized
// exactly once by the `install` function.

static VOTE_EXT_VERIFIED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static PROPOSAL_VERDICTS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static CALLBACK_DURATION_SECONDS: OnceCell<HistogramVec> = OnceCell::new();
static CACHED_VOTES: OnceCell<IntGauge> = OnceCell::new();
static VOTES_PERSISTED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static ACTIONS_PROCESSED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static ACTIONS_APPROVED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static ACTIONS_IGNORED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static VERIFIER_LATENCY_SECONDS: OnceCell<Histogram> = OnceCell::new();
static VERIFIER_FAILURES_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static WITHDRAWALS_LOCKED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

/// Runs `$body` against a collector if `install()` has registered it.
macro_rules! with_metric {
    ($metric:ident, |$m:ident| $body:expr) => {
        if let Some($m) = $metric.get() {
            $body;
        }
    };
}

impl VoteExtMetricsSink for PrometheusSink {
    fn inc_vote_ext_verified(&self, outcome: &'static str) {
        with_metric!(VOTE_EXT_VERIFIED_TOTAL, |m| m
            .with_label_values(&[outcome])
            .inc());
    }
    fn inc_proposal_verdict(&self, outcome: &'static str) {
        with_metric!(PROPOSAL_VERDICTS_TOTAL, |m| m
            .with_label_values(&[outcome])
            .inc());
    }
    fn observe_callback_duration(&self, callback: &'static str, duration_secs: f64) {
        with_metric!(CALLBACK_DURATION_SECONDS, |m| m
            .with_label_values(&[callback])
            .observe(duration_secs));
    }
    fn set_cached_votes(&self, count: usize) {
        with_metric!(CACHED_VOTES, |m| m.set(count as i64));
    }
    fn inc_votes_persisted(&self, count: u64) {
        with_metric!(VOTES_PERSISTED_TOTAL, |m| m.inc_by(count));
    }
}

impl BridgeMetricsSink for PrometheusSink {
    fn inc_actions_processed(&self, action_type: &'static str) {
        with_metric!(ACTIONS_PROCESSED_TOTAL, |m| m
            .with_label_values(&[action_type])
            .inc());
    }
    fn inc_actions_approved(&self, action_type: &'static str) {
        with_metric!(ACTIONS_APPROVED_TOTAL, |m| m
            .with_label_values(&[action_type])
            .inc());
    }
    fn inc_actions_ignored(&self, reason: &'static str) {
        with_metric!(ACTIONS_IGNORED_TOTAL, |m| m.with_label_values(&[reason]).inc());
    }
    fn observe_verifier_latency(&self, duration_secs: f64) {
        with_metric!(VERIFIER_LATENCY_SECONDS, |m| m.observe(duration_secs));
    }
    fn inc_verifier_failures(&self) {
        with_metric!(VERIFIER_FAILURES_TOTAL, |m| m.inc());
    }
    fn inc_withdrawals_locked(&self) {
        with_metric!(WITHDRAWALS_LOCKED_TOTAL, |m| m.inc());
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        with_metric!(ERRORS_TOTAL, |m| m.with_label_values(&[kind, variant]).inc());
    }
}

fn set_once<T>(cell: &OnceCell<T>, collector: T) -> Result<(), prometheus::Error> {
    cell.set(collector).map_err(|_| prometheus::Error::AlreadyReg)
}

/// Initializes all Prometheus metrics collectors and returns a static reference to the sink.
/// This function must be called only once at application startup.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    set_once(
        &VOTE_EXT_VERIFIED_TOTAL,
        register_int_counter_vec!(
            "pulsar_vote_ext_verified_total",
            "Peer vote extensions verified, by outcome.",
            &["outcome"]
        )?,
    )?;
    set_once(
        &PROPOSAL_VERDICTS_TOTAL,
        register_int_counter_vec!(
            "pulsar_proposal_verdicts_total",
            "Block proposals processed, by outcome.",
            &["outcome"]
        )?,
    )?;
    set_once(
        &CALLBACK_DURATION_SECONDS,
        register_histogram_vec!(
            "pulsar_vote_ext_callback_duration_seconds",
            "Latency of vote-extension callbacks.",
            &["callback"],
            exponential_buckets(0.0005, 2.0, 15)?
        )?,
    )?;
    set_once(
        &CACHED_VOTES,
        register_int_gauge!(
            "pulsar_vote_ext_cached_votes",
            "Votes held in the in-memory vote cache for the latest height."
        )?,
    )?;
    set_once(
        &VOTES_PERSISTED_TOTAL,
        register_int_counter!(
            "pulsar_vote_ext_persisted_total",
            "Vote-extension records written at pre-finalize."
        )?,
    )?;
    set_once(
        &ACTIONS_PROCESSED_TOTAL,
        register_int_counter_vec!(
            "pulsar_bridge_actions_processed_total",
            "Bridge actions kept by the verifier mask, by type.",
            &["action_type"]
        )?,
    )?;
    set_once(
        &ACTIONS_APPROVED_TOTAL,
        register_int_counter_vec!(
            "pulsar_bridge_actions_approved_total",
            "Bridge actions approved, by type.",
            &["action_type"]
        )?,
    )?;
    set_once(
        &ACTIONS_IGNORED_TOTAL,
        register_int_counter_vec!(
            "pulsar_bridge_actions_ignored_total",
            "Bridge actions ignored, by reason.",
            &["reason"]
        )?,
    )?;
    set_once(
        &VERIFIER_LATENCY_SECONDS,
        register_histogram!(
            "pulsar_bridge_verifier_latency_seconds",
            "Latency of action verifier round-trips.",
            exponential_buckets(0.005, 2.0, 12)?
        )?,
    )?;
    set_once(
        &VERIFIER_FAILURES_TOTAL,
        register_int_counter!(
            "pulsar_bridge_verifier_failures_total",
            "Failed action verifier round-trips."
        )?,
    )?;
    set_once(
        &WITHDRAWALS_LOCKED_TOTAL,
        register_int_counter!(
            "pulsar_bridge_withdrawals_locked_total",
            "Successful LockForWithdrawal messages."
        )?,
    )?;
    set_once(
        &ERRORS_TOTAL,
        register_int_counter_vec!(
            "pulsar_errors_total",
            "Total number of errors, categorized by type and variant.",
            &["kind", "variant"]
        )?,
    )?;

    static SINK: PrometheusSink = PrometheusSink;
    Ok(&SINK)
}
