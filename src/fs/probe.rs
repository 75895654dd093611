//! Read-only inspection of link paths.
//!
//! A probe never follows the final path component, so a symlink is always
//! reported as a symlink and not as whatever it points at. Probe results
//! are produced fresh on every call and must never be cached across a
//! filesystem mutation.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::DfiError;

/// Maximum number of symlink hops followed by [`chase_links`] before the
/// chain is declared pathological.
pub const MAX_LINK_DEPTH: u32 = 50;

/// What currently occupies a link path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// Nothing exists at the path.
    Absent,
    /// A symlink, with its raw (unresolved) target string.
    Symlink {
        /// The literal content of the symlink.
        raw_target: PathBuf,
    },
    /// A regular file or a directory.
    FileOrDir,
    /// A special file (FIFO, socket, device) with no resolution policy.
    Other {
        /// Human-readable description of the node type.
        file_type: String,
    },
}

/// Inspect the node at `path` without following a final symlink component.
///
/// Nonexistence is a normal result (`Absent`), not an error. A path that
/// exists but cannot be inspected (e.g. permission denied on an ancestor)
/// is a fatal error and must not be silently treated as absent.
///
/// # Errors
///
/// Returns [`DfiError::Io`] when the lookup fails for any reason other
/// than nonexistence.
pub fn probe(path: &Path) -> Result<ProbeResult, DfiError> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) => {
            let ft = meta.file_type();
            if ft.is_symlink() {
                let raw_target = std::fs::read_link(path)
                    .map_err(|source| DfiError::io(path.to_path_buf(), source))?;
                Ok(ProbeResult::Symlink { raw_target })
            } else if ft.is_file() || ft.is_dir() {
                Ok(ProbeResult::FileOrDir)
            } else {
                Ok(ProbeResult::Other {
                    file_type: describe_file_type(&ft),
                })
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ProbeResult::Absent),
        Err(source) => Err(DfiError::io(path.to_path_buf(), source)),
    }
}

/// Fully dereference a chain of symlinks starting at `link`.
///
/// Each hop is resolved relative to the current link's parent directory and
/// lexically normalized, mirroring how the kernel would interpret the link
/// content. The returned path is the first non-symlink node reached; it may
/// not exist (dangling chain).
///
/// # Errors
///
/// Returns [`DfiError::TooManySymlinks`] if the chain exceeds
/// [`MAX_LINK_DEPTH`] hops (a mutual cycle, for instance), or
/// [`DfiError::Io`] if a link cannot be read.
pub fn chase_links(link: &Path) -> Result<PathBuf, DfiError> {
    let mut cur = link.to_path_buf();
    for _ in 0..=MAX_LINK_DEPTH {
        match probe(&cur)? {
            ProbeResult::Symlink { raw_target } => {
                let joined = cur
                    .parent()
                    .map_or_else(|| raw_target.clone(), |parent| parent.join(&raw_target));
                cur = normalize_lexically(&joined);
            }
            _ => return Ok(cur),
        }
    }
    Err(DfiError::TooManySymlinks {
        path: link.to_path_buf(),
        depth: MAX_LINK_DEPTH,
    })
}

/// Whether the fully-chased `link` refers to the same filesystem entry as
/// `target`, by device+inode identity rather than string comparison.
///
/// Returns `Ok(None)` ("unknown") when the chain ends at a nonexistent path
/// or `target` itself does not exist; callers must treat unknown the same
/// as "not yet correct".
///
/// # Errors
///
/// Propagates [`DfiError::TooManySymlinks`] from the chase and
/// [`DfiError::Io`] for non-`NotFound` metadata failures.
pub fn link_resolves_to(link: &Path, target: &Path) -> Result<Option<bool>, DfiError> {
    let end = chase_links(link)?;
    let end_meta = match std::fs::metadata(&end) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(DfiError::io(end, source)),
    };
    let target_meta = match std::fs::metadata(target) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(DfiError::io(target.to_path_buf(), source)),
    };
    Ok(Some(same_entry(&end, &end_meta, target, &target_meta)))
}

/// Compare two already-stat'ed paths for filesystem identity.
#[cfg(unix)]
fn same_entry(
    _a: &Path,
    a_meta: &std::fs::Metadata,
    _b: &Path,
    b_meta: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    a_meta.dev() == b_meta.dev() && a_meta.ino() == b_meta.ino()
}

/// Compare two already-stat'ed paths for filesystem identity.
///
/// Windows has no stable inode surface through std, so fall back to
/// comparing canonicalized paths.
#[cfg(not(unix))]
fn same_entry(
    a: &Path,
    _a_meta: &std::fs::Metadata,
    b: &Path,
    _b_meta: &std::fs::Metadata,
) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root; `..` at the start of a relative path
/// is preserved.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(Component::ParentDir),
            },
            other => out.push(other),
        }
    }
    out
}

/// Describe a non-file, non-dir, non-symlink node for error messages.
fn describe_file_type(ft: &std::fs::FileType) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if ft.is_fifo() {
            return "fifo".to_string();
        }
        if ft.is_socket() {
            return "socket".to_string();
        }
        if ft.is_block_device() {
            return "block device".to_string();
        }
        if ft.is_char_device() {
            return "character device".to_string();
        }
    }
    format!("{ft:?}")
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn probe_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let result = probe(&tmp.path().join("nothing")).unwrap();
        assert_eq!(result, ProbeResult::Absent);
    }

    #[test]
    fn probe_regular_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert_eq!(probe(&file).unwrap(), ProbeResult::FileOrDir);
    }

    #[test]
    fn probe_directory() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(probe(tmp.path()).unwrap(), ProbeResult::FileOrDir);
    }

    #[cfg(unix)]
    #[test]
    fn probe_reports_symlink_with_raw_target() {
        let tmp = tempfile::tempdir().unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink("some/relative/target", &link).unwrap();
        assert_eq!(
            probe(&link).unwrap(),
            ProbeResult::Symlink {
                raw_target: PathBuf::from("some/relative/target")
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn probe_does_not_follow_dangling_symlink() {
        let tmp = tempfile::tempdir().unwrap();
        let link = tmp.path().join("dangling");
        std::os::unix::fs::symlink("missing", &link).unwrap();
        assert!(matches!(
            probe(&link).unwrap(),
            ProbeResult::Symlink { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn probe_inaccessible_path_is_fatal_not_absent() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let locked = tmp.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("file"), "x").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // A privileged process ignores the mode bits; nothing to observe then.
        if std::fs::symlink_metadata(locked.join("file")).is_ok() {
            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let err = probe(&locked.join("file")).unwrap_err();
        assert!(matches!(err, DfiError::Io { .. }));

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn probe_socket_is_other() {
        let tmp = tempfile::tempdir().unwrap();
        let sock = tmp.path().join("sock");
        let _listener = std::os::unix::net::UnixListener::bind(&sock).unwrap();
        assert_eq!(
            probe(&sock).unwrap(),
            ProbeResult::Other {
                file_type: "socket".to_string()
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn chase_links_follows_chain_relative_to_each_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let file = tmp.path().join("end");
        std::fs::write(&file, "x").unwrap();
        // sub/a -> b (sibling), sub/b -> ../end
        std::os::unix::fs::symlink("b", sub.join("a")).unwrap();
        std::os::unix::fs::symlink("../end", sub.join("b")).unwrap();

        let end = chase_links(&sub.join("a")).unwrap();
        assert_eq!(end, file);
    }

    #[cfg(unix)]
    #[test]
    fn chase_links_returns_nonexistent_end_for_dangling() {
        let tmp = tempfile::tempdir().unwrap();
        let link = tmp.path().join("dangling");
        std::os::unix::fs::symlink("missing", &link).unwrap();
        let end = chase_links(&link).unwrap();
        assert_eq!(end, tmp.path().join("missing"));
        assert!(!end.exists());
    }

    #[cfg(unix)]
    #[test]
    fn chase_links_detects_mutual_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::os::unix::fs::symlink("b", &a).unwrap();
        std::os::unix::fs::symlink("a", &b).unwrap();

        let err = chase_links(&a).unwrap_err();
        assert!(matches!(
            err,
            DfiError::TooManySymlinks {
                depth: MAX_LINK_DEPTH,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn link_resolves_to_true_for_matching_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        std::fs::write(&source, "x").unwrap();
        let link = tmp.path().join("link");
        // Relative string differs from the absolute target path; identity
        // must still match.
        std::os::unix::fs::symlink("source", &link).unwrap();

        assert_eq!(link_resolves_to(&link, &source).unwrap(), Some(true));
    }

    #[cfg(unix)]
    #[test]
    fn link_resolves_to_false_for_wrong_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        let other = tmp.path().join("other");
        std::fs::write(&source, "x").unwrap();
        std::fs::write(&other, "y").unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink("other", &link).unwrap();

        assert_eq!(link_resolves_to(&link, &source).unwrap(), Some(false));
    }

    #[cfg(unix)]
    #[test]
    fn link_resolves_to_unknown_for_dangling_link() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        std::fs::write(&source, "x").unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink("missing", &link).unwrap();

        assert_eq!(link_resolves_to(&link, &source).unwrap(), None);
    }

    #[test]
    fn normalize_collapses_dot_and_dotdot() {
        assert_eq!(
            normalize_lexically(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
    }

    #[test]
    fn normalize_keeps_root_at_root() {
        assert_eq!(
            normalize_lexically(Path::new("/../../x")),
            PathBuf::from("/x")
        );
    }

    #[test]
    fn normalize_preserves_leading_dotdot_in_relative_paths() {
        assert_eq!(
            normalize_lexically(Path::new("../a/../b")),
            PathBuf::from("../b")
        );
    }
}
