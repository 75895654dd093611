//! The reconciliation state machine for a single link specification.
//!
//! The state is whatever currently occupies the link path; the transition
//! table is:
//!
//! | current state                         | action                           |
//! |---------------------------------------|----------------------------------|
//! | absent                                | create the link                  |
//! | symlink resolving to the source       | nothing (already correct)        |
//! | symlink resolving elsewhere, dangling | symlink strategy, then re-probe  |
//! | regular file or directory             | file strategy, then re-probe     |
//! | special file (fifo, socket, device)   | fatal                            |
//!
//! Retries run as an explicit bounded loop, not recursion, and every
//! iteration re-probes from scratch: a strategy may have removed, renamed,
//! or deliberately kept the obstruction. The `warn` strategy never mutates
//! the filesystem, so it terminates the loop immediately with a skipped
//! outcome instead of retrying a state that cannot change.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{FileStrategy, SymlinkStrategy};
use crate::error::DfiError;
use crate::fs::probe::{ProbeResult, link_resolves_to, probe};
use crate::fs::{backup, create_symlink, ensure_parent_dir, remove_obstruction};
use crate::link::LinkSpec;

/// Upper bound on conflict-resolution retries for one spec.
///
/// Every retry follows a strategy that mutated the filesystem, so in
/// practice two iterations suffice; the cap converts any surprise into a
/// skipped outcome rather than a loop.
const MAX_RESOLVE_ATTEMPTS: u32 = 10;

/// How reconciling one [`LinkSpec`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The link did not exist and was created.
    Created,
    /// The link already pointed at the source; nothing was touched.
    AlreadyCorrect,
    /// The spec was deliberately not applied.
    Skipped {
        /// Why the spec was left alone.
        reason: String,
    },
    /// An obstruction was renamed to a backup slot and the link created.
    BackedUp {
        /// Where the obstruction went.
        backup_path: PathBuf,
    },
    /// An obstruction was removed and the link created.
    Replaced,
}

/// Strategy selection and directory-creation policy for a run.
///
/// Immutable for the duration of the run and threaded explicitly; there is
/// no ambient configuration.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Strategy for file/directory obstructions.
    pub file_strategy: FileStrategy,
    /// Strategy for wrong-target symlink obstructions.
    pub symlink_strategy: SymlinkStrategy,
    /// Whether missing link parent directories are created.
    pub create_missing_target_dirs: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            file_strategy: FileStrategy::default(),
            symlink_strategy: SymlinkStrategy::default(),
            create_missing_target_dirs: true,
        }
    }
}

/// What a strategy invocation asks the resolver to do next.
enum StrategyStep {
    /// The obstruction was cleared; re-probe and try again, and report this
    /// outcome if the link then gets created.
    Retry(ResolutionOutcome),
    /// Stop working on this spec.
    Skip(String),
}

/// Converge one link path to its specification.
///
/// # Errors
///
/// Returns [`DfiError::FilesystemConflict`] for special-file obstructions,
/// [`DfiError::FatalConflict`] when a `fail` strategy fires,
/// [`DfiError::BackupFailed`] / [`DfiError::TooManySymlinks`] from the
/// helpers, [`DfiError::CreateDir`] when the parent directory cannot be
/// created, and [`DfiError::Io`] for everything the OS refuses.
pub fn resolve(spec: &LinkSpec, opts: &ResolveOptions) -> Result<ResolutionOutcome, DfiError> {
    if opts.create_missing_target_dirs {
        ensure_parent_dir(&spec.link_path)?;
    }

    // Outcome earned by the strategy that cleared the way for the link.
    let mut pending: Option<ResolutionOutcome> = None;

    for _ in 0..MAX_RESOLVE_ATTEMPTS {
        match probe(&spec.link_path)? {
            ProbeResult::Absent => {
                create_symlink(&spec.link_target, &spec.link_path)?;
                debug!(
                    "linked {} -> {}",
                    spec.link_path.display(),
                    spec.link_target.display()
                );
                return Ok(pending.unwrap_or(ResolutionOutcome::Created));
            }
            ProbeResult::Symlink { raw_target } => {
                if link_resolves_to(&spec.link_path, &spec.source_path)? == Some(true) {
                    debug!(
                        "{} already resolves to {}",
                        spec.link_path.display(),
                        spec.source_path.display()
                    );
                    return Ok(ResolutionOutcome::AlreadyCorrect);
                }
                // Wrong target or dangling; both are symlink conflicts.
                debug!(
                    "{} points at {}, invoking symlink strategy",
                    spec.link_path.display(),
                    raw_target.display()
                );
                match apply_symlink_strategy(&spec.link_path, opts.symlink_strategy)? {
                    StrategyStep::Retry(outcome) => pending = Some(outcome),
                    StrategyStep::Skip(reason) => {
                        return Ok(ResolutionOutcome::Skipped { reason });
                    }
                }
            }
            ProbeResult::FileOrDir => {
                match apply_file_strategy(&spec.link_path, opts.file_strategy)? {
                    StrategyStep::Retry(outcome) => pending = Some(outcome),
                    StrategyStep::Skip(reason) => {
                        return Ok(ResolutionOutcome::Skipped { reason });
                    }
                }
            }
            ProbeResult::Other { file_type } => {
                return Err(DfiError::FilesystemConflict {
                    path: spec.link_path.clone(),
                    file_type,
                });
            }
        }
    }

    // A strategy keeps reporting progress but the path never clears.
    Ok(ResolutionOutcome::Skipped {
        reason: format!("no progress after {MAX_RESOLVE_ATTEMPTS} attempts"),
    })
}

/// Apply the file-type conflict strategy to the obstruction at `path`.
fn apply_file_strategy(path: &Path, strategy: FileStrategy) -> Result<StrategyStep, DfiError> {
    match strategy {
        FileStrategy::Backup => {
            let backup_path = backup::backup(path)?;
            debug!(
                "backed up {} to {}",
                path.display(),
                backup_path.display()
            );
            Ok(StrategyStep::Retry(ResolutionOutcome::BackedUp {
                backup_path,
            }))
        }
        FileStrategy::Replace => {
            remove_obstruction(path)?;
            debug!("removed conflicting file {}", path.display());
            Ok(StrategyStep::Retry(ResolutionOutcome::Replaced))
        }
        FileStrategy::Warn => Ok(StrategyStep::Skip(warn_and_skip(path))),
        FileStrategy::Fail => Err(DfiError::FatalConflict {
            path: path.to_path_buf(),
        }),
    }
}

/// Apply the symlink-type conflict strategy to the obstruction at `path`.
fn apply_symlink_strategy(
    path: &Path,
    strategy: SymlinkStrategy,
) -> Result<StrategyStep, DfiError> {
    match strategy {
        SymlinkStrategy::Replace => {
            remove_obstruction(path)?;
            debug!("removed conflicting symlink {}", path.display());
            Ok(StrategyStep::Retry(ResolutionOutcome::Replaced))
        }
        SymlinkStrategy::Warn => Ok(StrategyStep::Skip(warn_and_skip(path))),
        SymlinkStrategy::Fail => Err(DfiError::FatalConflict {
            path: path.to_path_buf(),
        }),
    }
}

/// Emit the warn-strategy event and produce the skip reason.
///
/// The message text is part of the externally-observable contract.
fn warn_and_skip(path: &Path) -> String {
    warn!(
        "conflict at {}: 'warn' strategy selected, continuing.",
        path.display()
    );
    format!("conflict at {} left in place ('warn' strategy)", path.display())
}
