//! In-memory audit log.

use std::io;

use parking_lot::Mutex;

use crate::audit::record::{AuditRecord, HEADER};
use crate::audit::sink::{AuditError, AuditSink};

const MEMORY_PATH: &str = "<memory>";

#[derive(Debug, Default)]
struct State {
    lines: Vec<String>,
    failure: Option<io::ErrorKind>,
}

/// Audit sink that keeps the log text in memory.
///
/// Follows the same header rule as [`FileAuditLog`](super::FileAuditLog).
/// [`fail_with`](Self::fail_with) makes every following append fail, which
/// is how storage refusing writes is simulated.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    state: Mutex<State>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make appends fail with the given error kind (`None` restores them).
    pub fn fail_with(&self, kind: Option<io::ErrorKind>) {
        self.state.lock().failure = kind;
    }

    /// All lines written so far, header included.
    pub fn lines(&self) -> Vec<String> {
        self.state.lock().lines.clone()
    }

    /// Number of records, header excluded.
    pub fn record_count(&self) -> usize {
        self.state.lock().lines.len().saturating_sub(1)
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut state = self.state.lock();
        if let Some(kind) = state.failure {
            return Err(AuditError::from_io(
                MEMORY_PATH,
                io::Error::new(kind, "simulated storage failure"),
            ));
        }

        if state.lines.is_empty() {
            state.lines.push(HEADER.to_string());
        }
        state.lines.push(record.to_string());
        Ok(())
    }
}
