//! Audit sink abstraction and errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::audit::record::AuditRecord;

/// Failure to record a granted access.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Storage refused to create or append to the log.
    #[error("permission denied writing audit log {path:?}: {source}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure while writing the log.
    #[error("failed to write audit log {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AuditError {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            AuditError::PermissionDenied { path, source }
        } else {
            AuditError::Io { path, source }
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, AuditError::PermissionDenied { .. })
    }
}

/// Append-only destination for audit records.
///
/// Implementations serialize appends: two concurrent calls never interleave
/// partial lines and never both write the header.
pub trait AuditSink: Send + Sync {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;
}
