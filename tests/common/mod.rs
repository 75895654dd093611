// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed settings repository so each test
// can set up an isolated home layout without repeating filesystem
// boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dfi::link::LinkSpec;

/// An isolated "home" directory with a `settings/dotfiles` tree inside it,
/// backed by a [`tempfile::TempDir`].
#[derive(Debug)]
pub struct Sandbox {
    tmp: tempfile::TempDir,
}

impl Sandbox {
    /// Create the sandbox with an empty `settings/dotfiles` directory.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(tmp.path().join("settings").join("dotfiles"))
            .expect("create dotfiles dir");
        Self { tmp }
    }

    /// The sandbox root (plays the role of `$HOME`).
    pub fn home(&self) -> &Path {
        self.tmp.path()
    }

    /// The version-controlled settings directory.
    pub fn settings_dir(&self) -> PathBuf {
        self.home().join("settings")
    }

    /// Write a dotfile source with the given content and return its path.
    pub fn add_dotfile(&self, name: &str, content: &str) -> PathBuf {
        let path = self.settings_dir().join("dotfiles").join(name);
        std::fs::write(&path, content).expect("write dotfile source");
        path
    }

    /// The spec linking `settings/dotfiles/<name>` to `<home>/.<name>`.
    pub fn spec_for(&self, name: &str) -> LinkSpec {
        LinkSpec::for_source(
            &self.settings_dir().join("dotfiles").join(name),
            self.home(),
            ".",
        )
    }

    /// The link path `<home>/.<name>`.
    pub fn link_path(&self, name: &str) -> PathBuf {
        self.home().join(format!(".{name}"))
    }

    /// File names in the sandbox root that contain a `.dfi_` backup marker.
    pub fn backup_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.home())
            .expect("read sandbox root")
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.contains(".dfi_"))
            .collect();
        names.sort();
        names
    }
}
