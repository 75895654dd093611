//! Domain-specific error types for the symlink reconciliation engine.
//!
//! Every variant carries the absolute path it refers to. All of these are
//! fatal: the first one raised aborts the reconciliation run. The only
//! conflict condition that is *not* an error is the `warn` strategy, which
//! logs and converts the conflict into a skipped outcome instead.
//!
//! Internal modules return [`DfiError`] and the CLI boundary converts it to
//! [`anyhow::Error`] via the standard `?` operator.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while reconciling link specifications.
#[derive(Error, Debug)]
pub enum DfiError {
    /// No free backup slot was found for a conflicting target path.
    ///
    /// Raised by the `backup` strategy after exhausting all 100 numbered
    /// slots at the current timestamp.
    #[error("Failed to back up conflicting target path {}", .path.display())]
    BackupFailed {
        /// The path that could not be renamed out of the way.
        path: PathBuf,
    },

    /// A symlink chain exceeded the hop bound; indicates a cycle or a
    /// pathological chain.
    #[error("Too many symbolic links encountered (> {depth}) trying to read conflicting target path {}", .path.display())]
    TooManySymlinks {
        /// The link path where resolution started.
        path: PathBuf,
        /// The hop bound that was exceeded.
        depth: u32,
    },

    /// A conflict occurred and `fail` was the selected resolution strategy.
    #[error("Conflict at path {} and 'fail' selected as resolution strategy", .path.display())]
    FatalConflict {
        /// The occupied link path.
        path: PathBuf,
    },

    /// The node occupying a link path is neither a plain file/directory nor
    /// a symlink, so no resolution policy applies.
    #[error("Unresolvable conflict at {}: occupied by {file_type}", .path.display())]
    FilesystemConflict {
        /// The occupied link path.
        path: PathBuf,
        /// Human-readable description of the occupying node (e.g. "fifo").
        file_type: String,
    },

    /// A link path's parent directory could not be created.
    ///
    /// Directory creation is not subject to conflict strategies; failure
    /// here is always fatal.
    #[error("Failed to create parent directory {}: {source}", .path.display())]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An underlying OS error (permission denied, disk full, ...) that is
    /// not reinterpreted as a conflict kind.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// The path the operation was acting on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl DfiError {
    /// Build a [`DfiError::Io`] from a path and an [`std::io::Error`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The absolute path this error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::BackupFailed { path }
            | Self::TooManySymlinks { path, .. }
            | Self::FatalConflict { path }
            | Self::FilesystemConflict { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}
