//! File-backed audit log.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::audit::record::{AuditRecord, HEADER};
use crate::audit::sink::{AuditError, AuditSink};

/// Append-only audit log file.
///
/// Every append opens the file, writes and closes it again, so the handle
/// never outlives a single call. The header is written when the file is
/// created (or found empty). Appends within this process are serialized by
/// an internal lock; other processes writing the same file are not
/// coordinated with.
///
/// A failed write is cut back to the length the file had before it, and a
/// torn tail left by a crash is closed off before the next record, so every
/// line stays whole and the first line stays the header.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn write_locked(&self, record: &AuditRecord) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut start = file.metadata()?.len();
        if is_torn_header(&mut file, start)? {
            file.set_len(0)?;
            start = 0;
        }

        let mut buf = String::new();
        if start == 0 {
            buf.push_str(HEADER);
            buf.push('\n');
        } else if !ends_with_newline(&mut file, start)? {
            buf.push('\n');
        }
        buf.push_str(&record.to_line());

        // One write per append so the line lands in a single O_APPEND write.
        let result = file.write_all(buf.as_bytes()).and_then(|()| file.flush());
        rollback_on_error(&file, start, result)
    }
}

/// True when the file holds only an incomplete header line.
fn is_torn_header(file: &mut File, len: u64) -> io::Result<bool> {
    let header_line_len = HEADER.len() as u64 + 1;
    if len == 0 || len >= header_line_len {
        return Ok(false);
    }

    let mut content = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut content)?;
    Ok(HEADER.as_bytes().starts_with(&content))
}

fn ends_with_newline(file: &mut File, len: u64) -> io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Truncate back to `start` when the write failed. The write error wins
/// over a failed truncation.
fn rollback_on_error(file: &File, start: u64, result: io::Result<()>) -> io::Result<()> {
    if let Err(e) = result {
        if let Err(truncate) = file.set_len(start) {
            tracing::error!(error = %truncate, "Failed to roll back partial audit write");
        }
        return Err(e);
    }
    Ok(())
}

impl AuditSink for FileAuditLog {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let _guard = self.lock.lock();
        self.write_locked(record)
            .map_err(|e| AuditError::from_io(&self.path, e))?;

        tracing::debug!(path = ?self.path, "Audit record appended");
        Ok(())
    }
}
