//! JSON persistence for the goal document.
//!
//! # Contract
//!
//! - [`load_document`] never fails. A missing file is an empty document; an
//!   unreadable or malformed one is logged, set aside as
//!   `<name>.corrupt-<unix_ms>` (copied, or moved when it cannot be read),
//!   and replaced by an empty document.
//! - Loaded documents are reconciled: each goal's current value is recomputed
//!   from its entries.
//! - [`save_document`] writes pretty JSON to a sibling temp file and renames
//!   it over the target while holding the document lock. Callers log a
//!   failed save; in-memory state stays valid.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::ErrorCode;
use crate::lock::{DEFAULT_LOCK_TIMEOUT, DocumentLock, LockError, lock_path_for};
use crate::model::{AppData, Reconciliation};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize goal document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lock error: {0}")]
    Lock(#[from] LockError),
}

impl StorageError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::DocumentUnreadable,
            Self::Serialize(_) | Self::Write { .. } => ErrorCode::DocumentWriteFailed,
            Self::Lock(err) => err.code(),
        }
    }
}

/// Read the document exactly as stored, without reconciling.
///
/// A missing file is an empty document.
///
/// # Errors
///
/// [`StorageError::Read`] or [`StorageError::Parse`] when the file exists but
/// cannot be used.
pub fn load_document_raw(path: &Path) -> Result<AppData, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no goal document yet");
            return Ok(AppData::default());
        }
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(AppData::default());
    }

    serde_json::from_str(&content).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and reconcile the document, falling back to an empty one.
#[must_use]
pub fn load_document(path: &Path) -> AppData {
    let mut data = match load_document_raw(path) {
        Ok(data) => data,
        Err(err) => {
            warn!(error = %err, code = %err.code(), "goal document unreadable; starting empty");
            if path.exists() {
                preserve_unreadable(path);
            }
            return AppData::default();
        }
    };

    for fix in data.reconcile() {
        log_reconciliation(&fix);
    }

    debug!(path = %path.display(), goals = data.goals.len(), "loaded goal document");
    data
}

/// Serialize and atomically replace the document on disk.
///
/// # Errors
///
/// Returns a [`StorageError`] if the lock cannot be taken or the write fails.
pub fn save_document(path: &Path, data: &AppData) -> Result<(), StorageError> {
    save_document_with_timeout(path, data, DEFAULT_LOCK_TIMEOUT)
}

/// [`save_document`] with an explicit lock wait.
///
/// # Errors
///
/// Returns a [`StorageError`] if the lock cannot be taken or the write fails.
pub fn save_document_with_timeout(
    path: &Path,
    data: &AppData,
    lock_timeout: Duration,
) -> Result<(), StorageError> {
    let mut bytes = serde_json::to_vec_pretty(data)?;
    bytes.push(b'\n');

    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let lock = DocumentLock::acquire(&lock_path_for(path), lock_timeout)?;

    let tmp = sibling(path, ".tmp");
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    lock.release();

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(source));
    }

    info!(path = %path.display(), goals = data.goals.len(), bytes = bytes.len(), "saved goal document");
    Ok(())
}

fn log_reconciliation(fix: &Reconciliation) {
    warn!(
        goal_id = %fix.goal_id,
        stored = fix.stored,
        computed = fix.computed,
        "current value disagreed with entries; recomputed"
    );
}

fn preserve_unreadable(path: &Path) {
    let backup = sibling(path, &format!(".corrupt-{}", Utc::now().timestamp_millis()));
    match fs::copy(path, &backup) {
        Ok(_) => warn!(backup = %backup.display(), "kept a copy of the unreadable document"),
        // Unreadable files cannot be copied; move them instead.
        Err(copy_err) => match fs::rename(path, &backup) {
            Ok(()) => warn!(
                backup = %backup.display(),
                error = %copy_err,
                "moved the unreadable document aside"
            ),
            Err(err) => warn!(error = %err, "could not set unreadable document aside"),
        },
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
