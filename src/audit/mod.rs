//! Audit trail subsystem.
//!
//! # Data Flow
//! ```text
//! Allow(Grant)
//!     → record.rs (AuditRecord: "timestamp, name, email, ip")
//!     → sink.rs (AuditSink::append, serialized)
//!         → file.rs   (create with header if needed, append one line)
//!         → memory.rs (same contract, in memory)
//! ```
//!
//! # Design Decisions
//! - Recording is mandatory: a failed append fails the request
//! - No retry, no fallback location, no rotation
//! - The sink is injected into the HTTP layer, never a global

pub mod file;
pub mod memory;
pub mod record;
pub mod sink;

pub use file::FileAuditLog;
pub use memory::MemoryAuditLog;
pub use record::{AuditRecord, HEADER};
pub use sink::{AuditError, AuditSink};

use crate::gate::Grant;

/// Append the record for a granted access.
pub fn record(sink: &dyn AuditSink, grant: &Grant) -> Result<(), AuditError> {
    sink.append(&AuditRecord::from(grant))
}
