//! Filesystem primitives: probing, symlink creation/removal, backups.
//!
//! Everything in here is a plain blocking filesystem call. The probe layer
//! is read-only; the mutation helpers below are the only places the engine
//! touches the disk.

pub mod backup;
pub mod probe;

use std::path::Path;

use crate::error::DfiError;

/// Ensure the immediate parent directory of `path` exists, creating it and
/// any intermediate ancestors if needed. On Unix, created directories get
/// mode `0755`.
///
/// Directory creation is not subject to conflict strategies.
///
/// # Errors
///
/// Returns [`DfiError::CreateDir`] if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), DfiError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt as _;
            builder.mode(0o755);
        }
        builder.create(parent).map_err(|source| DfiError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Create a symlink at `link` whose content is `target`.
///
/// `target` is written verbatim and may be relative (interpreted against
/// the link's parent directory) or absolute.
///
/// # Errors
///
/// Returns [`DfiError::Io`] if the symlink cannot be created.
pub fn create_symlink(target: &Path, link: &Path) -> Result<(), DfiError> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
            .map_err(|source| DfiError::io(link.to_path_buf(), source))?;
    }

    #[cfg(windows)]
    {
        // Resolve the target against the link's parent to decide between
        // file and directory symlink APIs.
        let resolved = link
            .parent()
            .map_or_else(|| target.to_path_buf(), |p| p.join(target));
        let result = if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };
        result.map_err(|source| DfiError::io(link.to_path_buf(), source))?;
    }

    Ok(())
}

/// Remove whatever currently occupies `path`: a symlink, a regular file, or
/// a directory tree.
///
/// Symlinks are unlinked, never followed: removing a directory symlink
/// must not delete the directory it points at.
///
/// # Errors
///
/// Returns [`DfiError::Io`] if the node cannot be removed.
pub fn remove_obstruction(path: &Path) -> Result<(), DfiError> {
    let meta = std::fs::symlink_metadata(path)
        .map_err(|source| DfiError::io(path.to_path_buf(), source))?;
    let result = if meta.file_type().is_symlink() {
        remove_symlink_node(path, &meta)
    } else if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|source| DfiError::io(path.to_path_buf(), source))
}

/// Unlink a symlink node.
///
/// On Windows, directory symlinks must be removed with `remove_dir` rather
/// than `remove_file`.
fn remove_symlink_node(path: &Path, meta: &std::fs::Metadata) -> std::io::Result<()> {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        if meta.file_attributes() & 0x10 != 0 {
            // FILE_ATTRIBUTE_DIRECTORY
            return std::fs::remove_dir(path);
        }
    }
    let _ = meta;
    std::fs::remove_file(path)
}
