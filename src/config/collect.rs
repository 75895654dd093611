//! Source path collection for file groups.
//!
//! Gathers the direct members of each configured directory under a group's
//! base dir, filters out entries whose file name matches an exclude
//! pattern, and returns the survivors sorted. Dangling entries are dropped.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DfiError;

/// Collect candidate source paths from `dirs` under `base_dir`.
///
/// Directories that do not exist are skipped with a debug log; a group may
/// declare `dotfiles` and `bin` dirs and have only one of them checked in.
///
/// # Errors
///
/// Returns [`DfiError::Io`] if an existing directory cannot be read.
pub fn collect(
    base_dir: &Path,
    dirs: &[PathBuf],
    excludes: &[String],
) -> Result<Vec<PathBuf>, DfiError> {
    let mut out = Vec::new();
    for dir in dirs {
        let dir = base_dir.join(dir);
        if !dir.is_dir() {
            debug!("source dir missing, skipping: {}", dir.display());
            continue;
        }
        let entries =
            std::fs::read_dir(&dir).map_err(|source| DfiError::io(dir.clone(), source))?;
        for entry in entries {
            let entry = entry.map_err(|source| DfiError::io(dir.clone(), source))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if excludes.iter().any(|pat| pattern_matches(pat, &name)) {
                debug!("excluded: {}", entry.path().display());
                continue;
            }
            let path = entry.path();
            if !path.exists() {
                // dangling symlink in the source tree
                continue;
            }
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Match a file name against a shell-style pattern supporting `*` and `?`.
fn pattern_matches(pattern: &str, name: &str) -> bool {
    fn inner(p: &[char], n: &[char]) -> bool {
        match p.split_first() {
            None => n.is_empty(),
            Some(('*', rest)) => (0..=n.len()).any(|i| inner(rest, &n[i..])),
            Some(('?', rest)) => n.split_first().is_some_and(|(_, tail)| inner(rest, tail)),
            Some((c, rest)) => n
                .split_first()
                .is_some_and(|(first, tail)| first == c && inner(rest, tail)),
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();
    inner(&p, &n)
}
