//! Conflict-resolution strategy selectors.
//!
//! Strategy names are closed enums validated once when configuration is
//! constructed (CLI parse or TOML deserialize), never re-validated at the
//! point of use. `delete` survives as a parse-time alias of `replace` for
//! old configs; `replace` is the canonical name.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How to resolve a link path occupied by a regular file or directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStrategy {
    /// Rename the obstruction to a timestamped backup slot, then link.
    #[default]
    Backup,
    /// Remove the obstruction, then link.
    #[value(alias = "delete")]
    #[serde(alias = "delete")]
    Replace,
    /// Log a warning and leave the obstruction in place (the spec is
    /// skipped).
    Warn,
    /// Abort the whole run.
    Fail,
}

/// How to resolve a link path occupied by a symlink that points somewhere
/// other than the desired source.
///
/// There is no backup variant: preserving a stale symlink target has no
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymlinkStrategy {
    /// Remove the wrong link, then relink.
    #[default]
    Replace,
    /// Log a warning and leave the wrong link in place.
    Warn,
    /// Abort the whole run.
    Fail,
}

impl std::fmt::Display for FileStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Backup => "backup",
            Self::Replace => "replace",
            Self::Warn => "warn",
            Self::Fail => "fail",
        };
        f.write_str(name)
    }
}

impl std::fmt::Display for SymlinkStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Replace => "replace",
            Self::Warn => "warn",
            Self::Fail => "fail",
        };
        f.write_str(name)
    }
}
