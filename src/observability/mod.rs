//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate handler produces:
//!     → logging.rs (structured log events per decision)
//!     → metrics.rs (outcome counters, audit latency)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings
//! - Request ID flows through every event of a request span
//! - The audit log is not a log stream; it never goes through tracing

pub mod logging;
pub mod metrics;
