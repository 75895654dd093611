//! Conflict-resolving dotfile symlink installer.
//!
//! Keeps configuration files under source control in a single directory and
//! symlinks them into place, converging the filesystem to a declared set of
//! (source, link) pairs no matter what currently occupies each link path.
//!
//! The crate is organised around the reconciliation core:
//!
//! - **[`link`]**: link specifications: (source, link path, link content)
//! - **[`fs`]**: probing, symlink chasing, backups, mutation primitives
//! - **[`resolve`]**: the per-spec conflict-resolution state machine
//! - **[`reconcile`]**: the driver that applies an ordered spec list
//! - **[`config`]**: file groups, strategy selection, TOML profiles
//!
//! Reconciliation is idempotent: a second run over the same specs finds
//! every link already correct and mutates nothing.

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod link;
pub mod logging;
pub mod reconcile;
pub mod resolve;

pub use error::DfiError;
