//! Link specifications: the desired (source, link, content) triples.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One desired symlink: an absolute source path, the absolute path of the
/// link itself, and the string that becomes the symlink's content.
///
/// The link target, interpreted relative to the link path's parent
/// directory, resolves to the source path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// The version-controlled file or directory the link will point at.
    pub source_path: PathBuf,
    /// The path of the symlink itself.
    pub link_path: PathBuf,
    /// The content written into the symlink, relative where source and
    /// link share a common root, absolute otherwise.
    pub link_target: PathBuf,
}

impl LinkSpec {
    /// Create a spec from explicit parts.
    #[must_use]
    pub const fn new(source_path: PathBuf, link_path: PathBuf, link_target: PathBuf) -> Self {
        Self {
            source_path,
            link_path,
            link_target,
        }
    }

    /// Build the spec for linking `source_path` into `target_dir` with the
    /// given file-name prefix (e.g. `.` for dotfiles, empty for bin files).
    ///
    /// The link content is computed from the common root of source and
    /// link: enough `..` components to climb from the link's parent to the
    /// common ancestor, then the source path relative to that ancestor.
    ///
    /// ```
    /// use std::path::Path;
    /// use dfi::link::LinkSpec;
    ///
    /// let spec = LinkSpec::for_source(
    ///     Path::new("/home/u/.settings/dotfiles/bashrc"),
    ///     Path::new("/home/u"),
    ///     ".",
    /// );
    /// assert_eq!(spec.link_path, Path::new("/home/u/.bashrc"));
    /// assert_eq!(spec.link_target, Path::new(".settings/dotfiles/bashrc"));
    /// ```
    ///
    /// Without a common root (other than the filesystem root itself) the
    /// absolute source path is used verbatim.
    #[must_use]
    pub fn for_source(source_path: &Path, target_dir: &Path, prefix: &str) -> Self {
        let name = source_path
            .file_name()
            .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
        let mut link_name = OsString::from(prefix);
        link_name.push(&name);
        let link_path = target_dir.join(&link_name);

        let link_target = find_common_root(source_path, &link_path).map_or_else(
            || source_path.to_path_buf(),
            |common| {
                let link_parent_depth = link_path
                    .parent()
                    .map_or(0, |p| p.components().count());
                let ups = link_parent_depth.saturating_sub(common.components().count());
                let mut target = PathBuf::new();
                for _ in 0..ups {
                    target.push("..");
                }
                match source_path.strip_prefix(&common) {
                    Ok(rel) => target.join(rel),
                    Err(_) => source_path.to_path_buf(),
                }
            },
        );

        Self {
            source_path: source_path.to_path_buf(),
            link_path,
            link_target,
        }
    }
}

/// Deepest common ancestor of two absolute paths, or `None` when they share
/// nothing below the filesystem root.
#[must_use]
pub fn find_common_root(a: &Path, b: &Path) -> Option<PathBuf> {
    let mut common = PathBuf::new();
    for (ca, cb) in a.components().zip(b.components()) {
        if ca == cb {
            common.push(ca);
        } else {
            break;
        }
    }
    if common
        .components()
        .any(|c| matches!(c, Component::Normal(_)))
    {
        Some(common)
    } else {
        None
    }
}

/// Drop specs with duplicate link-path file names, first occurrence wins,
/// and return the survivors sorted by link file name.
#[must_use]
pub fn dedup_links(specs: Vec<LinkSpec>) -> Vec<LinkSpec> {
    let mut by_name: BTreeMap<OsString, LinkSpec> = BTreeMap::new();
    for spec in specs {
        let name = spec
            .link_path
            .file_name()
            .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
        by_name.entry(name).or_insert(spec);
    }
    by_name.into_values().collect()
}
