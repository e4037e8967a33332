//! Access gate subsystem.
//!
//! # Data Flow
//! ```text
//! Received
//!     → verdict.rs (allow-list match on the proxy verdict)
//!     → VerdictChecked
//!         ├─ not SUCCESS → Deny(verdict, subject)          [terminal]
//!         └─ SUCCESS     → identity::dn parses the subject
//!                        → Allow(identity, client, timestamp)
//!                        → audit (Logged | LogFailed)      [terminal]
//! ```
//!
//! # Design Decisions
//! - Fail closed: a missing or unknown verdict is never success
//! - Pure: no I/O, safe on any number of request tasks
//! - The proxy is trusted; certificates are not re-validated here

pub mod decision;
pub mod verdict;

pub use decision::{decide, AccessDecision, Denial, Grant, TIMESTAMP_FORMAT};
pub use verdict::Verdict;
