// Path: crates/telemetry/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Pulsar Telemetry
//!
//! Logging and metrics for the validator core. Components never talk to
//! Prometheus directly: the vote-extension handler and the bridge keeper hold a
//! `&'static dyn *MetricsSink`, which is the no-op sink until a binary calls
//! [`prometheus::install`] and stores the result in [`sinks::SINK`].

/// `/metrics`, `/healthz` and `/readyz` over axum.
pub mod http;
/// JSON `tracing` subscriber setup.
pub mod init;
/// Prometheus collectors behind the sink traits.
pub mod prometheus;
/// Sink traits, the no-op sink and the global handle.
pub mod sinks;
/// Callback latency timer.
pub mod time;

pub use sinks::{bridge_metrics, error_metrics, vote_ext_metrics};
