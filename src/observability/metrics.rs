//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cert_gate_decisions_total` (counter): requests by outcome
//!   (`allowed`, `denied`, `log_failed`)
//! - `cert_gate_audit_append_seconds` (histogram): audit append latency
//!
//! Without an installed recorder every call is a no-op, so tests and
//! deployments with metrics disabled pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

const DECISIONS_TOTAL: &str = "cert_gate_decisions_total";
const AUDIT_APPEND_SECONDS: &str = "cert_gate_audit_append_seconds";

/// Terminal state of one gated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Allowed,
    Denied,
    LogFailed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Allowed => "allowed",
            Outcome::Denied => "denied",
            Outcome::LogFailed => "log_failed",
        }
    }
}

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(DECISIONS_TOTAL, "Gated requests by terminal outcome");
    describe_histogram!(AUDIT_APPEND_SECONDS, "Time spent appending one audit record");

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_outcome(outcome: Outcome) {
    counter!(DECISIONS_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

pub fn record_audit_append(start: Instant) {
    histogram!(AUDIT_APPEND_SECONDS).record(start.elapsed().as_secs_f64());
}
