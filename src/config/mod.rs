//! Run configuration: file groups, settings, strategy selection.
//!
//! This layer is the upstream collaborator of the reconciliation core: it
//! turns configuration into a finalized, deduplicated, ordered sequence of
//! [`LinkSpec`]s plus two strategy selections. The core never learns how
//! they were produced.

pub mod collect;
pub mod file;
pub mod strategy;

pub use strategy::{FileStrategy, SymlinkStrategy};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DfiError;
use crate::link::{LinkSpec, dedup_links};

/// Exclude patterns applied when a group does not configure its own.
pub const DEFAULT_EXCLUDES: &[&str] = &[".*"];

/// A group of source files to be linked into one target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileGroup {
    /// The version-controlled directory containing the files to symlink.
    pub base_dir: PathBuf,
    /// Directories whose direct members become link sources.
    pub dirs: Vec<PathBuf>,
    /// File-name patterns (`*`/`?`) excluded from collection.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,
    /// Absolute directory where the symlinks are created.
    pub target_dir: PathBuf,
    /// Prefix prepended to each link's file name (e.g. `.`).
    #[serde(default)]
    pub link_prefix: String,
}

fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect()
}

impl FileGroup {
    /// Stock group for dotfiles: members of `<base>/dotfiles` linked into
    /// the parent of `base_dir` with a `.` prefix.
    #[must_use]
    pub fn dotfiles(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            dirs: vec![PathBuf::from("dotfiles")],
            excludes: default_excludes(),
            target_dir: parent_of(base_dir),
            link_prefix: ".".to_string(),
        }
    }

    /// Stock group for bin files: members of `<base>/bin` linked into
    /// `../.local/bin` without a prefix.
    #[must_use]
    pub fn binfiles(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            dirs: vec![PathBuf::from("bin")],
            excludes: default_excludes(),
            target_dir: parent_of(base_dir).join(".local").join("bin"),
            link_prefix: String::new(),
        }
    }

    /// The finalized link specs for this group: collected sources, mapped
    /// to link paths, deduplicated first-wins by link file name.
    ///
    /// # Errors
    ///
    /// Returns [`DfiError::Io`] if a configured source directory cannot be
    /// read.
    pub fn link_specs(&self) -> Result<Vec<LinkSpec>, DfiError> {
        let sources = collect::collect(&self.base_dir, &self.dirs, &self.excludes)?;
        let specs = sources
            .iter()
            .map(|s| LinkSpec::for_source(s, &self.target_dir, &self.link_prefix))
            .collect();
        Ok(dedup_links(specs))
    }
}

/// A full run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// The directory containing all files in this collection.
    pub base_dir: PathBuf,
    /// The file groups to reconcile, in order.
    pub file_groups: Vec<FileGroup>,
    /// Strategy for link paths occupied by a regular file or directory.
    #[serde(default)]
    pub conflicting_file_strategy: FileStrategy,
    /// Strategy for link paths occupied by a wrong-target symlink.
    #[serde(default)]
    pub conflicting_symlink_strategy: SymlinkStrategy,
    /// Whether missing link parent directories are created.
    #[serde(default = "default_true")]
    pub create_missing_target_dirs: bool,
}

const fn default_true() -> bool {
    true
}

impl Settings {
    /// The standard profile: dotfiles and bin files under `base_dir`, with
    /// default strategies (backup files, replace symlinks).
    #[must_use]
    pub fn standard(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            file_groups: vec![FileGroup::dotfiles(base_dir), FileGroup::binfiles(base_dir)],
            conflicting_file_strategy: FileStrategy::default(),
            conflicting_symlink_strategy: SymlinkStrategy::default(),
            create_missing_target_dirs: true,
        }
    }

    /// All link specs across all file groups, in group order.
    ///
    /// Dedup is per group, matching how groups were collected historically;
    /// cross-group collisions are resolved by the reconciler finding the
    /// link already correct.
    ///
    /// # Errors
    ///
    /// Returns [`DfiError::Io`] if a source directory cannot be read.
    pub fn link_specs(&self) -> Result<Vec<LinkSpec>, DfiError> {
        let mut all = Vec::new();
        for group in &self.file_groups {
            all.extend(group.link_specs()?);
        }
        Ok(all)
    }
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent()
        .map_or_else(|| path.to_path_buf(), Path::to_path_buf)
}
