//! Timestamped backup names for displaced files.
//!
//! The `backup` strategy renames an obstruction to
//! `<path>.dfi_<UTC-timestamp>_<NNN>` where `NNN` is the first unused
//! zero-padded slot in `[0, 100)` at that timestamp. The fixed slot count
//! means a conflicting path is never silently overwritten, but name
//! generation also can't loop forever.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::DfiError;

/// Number of numbered backup slots per timestamp.
const BACKUP_SLOTS: u32 = 100;

/// Timestamp format baked into backup names: `YYYYMMDDHHmmss`, UTC.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Rename `path` to the first free backup slot and return the new name.
///
/// # Errors
///
/// Returns [`DfiError::BackupFailed`] when all slots at the current
/// timestamp are occupied, or [`DfiError::Io`] if the rename fails.
pub fn backup(path: &Path) -> Result<PathBuf, DfiError> {
    backup_at(path, &timestamp())
}

/// Current UTC timestamp in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Slot search with an explicit timestamp, so tests can pin the clock.
pub(crate) fn backup_at(path: &Path, stamp: &str) -> Result<PathBuf, DfiError> {
    for n in 0..BACKUP_SLOTS {
        let candidate = backup_name(path, stamp, n);
        match std::fs::symlink_metadata(&candidate) {
            Ok(_) => {} // slot taken, try the next one
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                std::fs::rename(path, &candidate)
                    .map_err(|source| DfiError::io(path.to_path_buf(), source))?;
                return Ok(candidate);
            }
            Err(source) => return Err(DfiError::io(candidate, source)),
        }
    }
    Err(DfiError::BackupFailed {
        path: path.to_path_buf(),
    })
}

/// Backup name for slot `n`: the full file name with `.dfi_<stamp>_<nnn>`
/// appended.
fn backup_name(path: &Path, stamp: &str, n: u32) -> PathBuf {
    let suffix = format!(".dfi_{stamp}_{n:03}");
    path.file_name().map_or_else(
        || {
            let mut full = path.as_os_str().to_os_string();
            full.push(&suffix);
            PathBuf::from(full)
        },
        |name| {
            let mut name = name.to_os_string();
            name.push(&suffix);
            path.with_file_name(name)
        },
    )
}
