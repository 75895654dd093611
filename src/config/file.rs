//! TOML configuration file loading.
//!
//! A `dfi.toml` holds profile sections as top-level keys, plus an optional
//! `[default]` section whose values apply wherever the profile or a file
//! group stays silent. Relative paths are resolved against the config
//! file's directory.
//!
//! ```toml
//! [default]
//! base_dir = "."
//! conflicting_file_strategy = "backup"
//!
//! [standard]
//! file_groups = [
//!   { dirs = ["dotfiles"], link_prefix = "." },
//!   { dirs = ["bin"], target_dir = "../.local/bin" },
//! ]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use serde::Deserialize;

use super::{DEFAULT_EXCLUDES, FileGroup, FileStrategy, Settings, SymlinkStrategy};
use crate::fs::probe::normalize_lexically;

/// Values from the `[default]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefaultSection {
    base_dir: Option<PathBuf>,
    conflicting_file_strategy: Option<FileStrategy>,
    conflicting_symlink_strategy: Option<SymlinkStrategy>,
    create_missing_target_dirs: Option<bool>,
    link_prefix: Option<String>,
    excludes: Option<Vec<String>>,
}

/// One profile section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileSection {
    base_dir: Option<PathBuf>,
    #[serde(default)]
    file_groups: Vec<FileGroupEntry>,
    conflicting_file_strategy: Option<FileStrategy>,
    conflicting_symlink_strategy: Option<SymlinkStrategy>,
    create_missing_target_dirs: Option<bool>,
}

/// One file-group entry inside a profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileGroupEntry {
    base_dir: Option<PathBuf>,
    dirs: Vec<PathBuf>,
    excludes: Option<Vec<String>>,
    target_dir: Option<PathBuf>,
    link_prefix: Option<String>,
}

/// Load `profile` from the TOML config file at `path`.
///
/// The profile section overrides `[default]`; file-group entries override
/// both. A profile with no `file_groups` gets the standard dotfiles + bin
/// groups for its base dir.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, the profile section is
/// absent, or no base dir is configured anywhere.
pub fn load(path: &Path, profile: &str) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let table: toml::Table = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;

    let defaults = match table.get("default") {
        Some(value) => value
            .clone()
            .try_into::<DefaultSection>()
            .with_context(|| format!("Invalid [default] section in {}", path.display()))?,
        None => DefaultSection::default(),
    };

    let Some(section) = table.get(profile) else {
        bail!(
            "Profile '{profile}' not found in {} (available: {})",
            path.display(),
            table
                .keys()
                .filter(|k| k.as_str() != "default")
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    };
    let section = section
        .clone()
        .try_into::<ProfileSection>()
        .with_context(|| format!("Invalid [{profile}] section in {}", path.display()))?;

    let anchor = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let anchor = if anchor.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        anchor
    };

    let base_dir = section
        .base_dir
        .as_ref()
        .or(defaults.base_dir.as_ref())
        .map(|p| absolutize(p, &anchor))
        .transpose()?;
    let Some(base_dir) = base_dir else {
        bail!(
            "Profile '{profile}' in {} has no base_dir (set it in the profile or [default])",
            path.display()
        );
    };

    let file_groups = if section.file_groups.is_empty() {
        vec![
            FileGroup::dotfiles(&base_dir),
            FileGroup::binfiles(&base_dir),
        ]
    } else {
        section
            .file_groups
            .iter()
            .map(|entry| resolve_group(entry, &base_dir, &defaults, &anchor))
            .collect::<Result<Vec<_>>>()?
    };

    Ok(Settings {
        base_dir,
        file_groups,
        conflicting_file_strategy: section
            .conflicting_file_strategy
            .or(defaults.conflicting_file_strategy)
            .unwrap_or_default(),
        conflicting_symlink_strategy: section
            .conflicting_symlink_strategy
            .or(defaults.conflicting_symlink_strategy)
            .unwrap_or_default(),
        create_missing_target_dirs: section
            .create_missing_target_dirs
            .or(defaults.create_missing_target_dirs)
            .unwrap_or(true),
    })
}

/// Fill one file-group entry from the profile base dir and `[default]`.
fn resolve_group(
    entry: &FileGroupEntry,
    profile_base: &Path,
    defaults: &DefaultSection,
    anchor: &Path,
) -> Result<FileGroup> {
    let base_dir = entry
        .base_dir
        .as_ref()
        .map_or_else(|| Ok(profile_base.to_path_buf()), |p| absolutize(p, anchor))?;
    // Relative target dirs hang off the group's base dir.
    let target_dir = entry.target_dir.as_ref().map_or_else(
        || {
            base_dir
                .parent()
                .map_or_else(|| base_dir.clone(), Path::to_path_buf)
        },
        |t| {
            if t.is_absolute() {
                t.clone()
            } else {
                normalize_lexically(&base_dir.join(t))
            }
        },
    );
    Ok(FileGroup {
        base_dir,
        dirs: entry.dirs.clone(),
        excludes: entry.excludes.clone().unwrap_or_else(|| {
            defaults
                .excludes
                .clone()
                .unwrap_or_else(|| DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect())
        }),
        target_dir,
        link_prefix: entry
            .link_prefix
            .clone()
            .unwrap_or_else(|| defaults.link_prefix.clone().unwrap_or_default()),
    })
}

/// Make `path` absolute against `anchor` and collapse `.`/`..`.
fn absolutize(path: &Path, anchor: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let anchor = anchor
        .canonicalize()
        .with_context(|| format!("Failed to resolve directory: {}", anchor.display()))?;
    Ok(normalize_lexically(&anchor.join(path)))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dfi.toml");
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn loads_minimal_profile_with_stock_groups() {
        let (tmp, path) = write_config("[standard]\nbase_dir = \".\"\n");
        let settings = load(&path, "standard").unwrap();
        assert_eq!(settings.base_dir, tmp.path().canonicalize().unwrap());
        assert_eq!(settings.file_groups.len(), 2);
        assert_eq!(settings.conflicting_file_strategy, FileStrategy::Backup);
        assert_eq!(
            settings.conflicting_symlink_strategy,
            SymlinkStrategy::Replace
        );
    }

    #[test]
    fn profile_overrides_default_strategies() {
        let (_tmp, path) = write_config(
            "[default]\nbase_dir = \".\"\nconflicting_file_strategy = \"warn\"\n\n\
             [work]\nconflicting_file_strategy = \"fail\"\n",
        );
        let settings = load(&path, "work").unwrap();
        assert_eq!(settings.conflicting_file_strategy, FileStrategy::Fail);
    }

    #[test]
    fn default_section_fills_profile_gaps() {
        let (_tmp, path) = write_config(
            "[default]\nbase_dir = \".\"\nconflicting_symlink_strategy = \"fail\"\n\n[minimal]\n",
        );
        let settings = load(&path, "minimal").unwrap();
        assert_eq!(
            settings.conflicting_symlink_strategy,
            SymlinkStrategy::Fail
        );
    }

    #[test]
    fn explicit_file_groups_resolve_relative_target_dirs() {
        let (tmp, path) = write_config(
            "[standard]\nbase_dir = \".\"\nfile_groups = [\n\
             { dirs = [\"bin\"], target_dir = \"../.local/bin\" },\n]\n",
        );
        let settings = load(&path, "standard").unwrap();
        let root = tmp.path().canonicalize().unwrap();
        assert_eq!(settings.file_groups.len(), 1);
        assert_eq!(
            settings.file_groups[0].target_dir,
            root.parent().unwrap().join(".local").join("bin")
        );
        assert_eq!(settings.file_groups[0].excludes, vec![".*".to_string()]);
    }

    #[test]
    fn group_link_prefix_defaults_from_default_section() {
        let (_tmp, path) = write_config(
            "[default]\nlink_prefix = \".\"\n\n\
             [standard]\nbase_dir = \".\"\nfile_groups = [{ dirs = [\"dotfiles\"] }]\n",
        );
        let settings = load(&path, "standard").unwrap();
        assert_eq!(settings.file_groups[0].link_prefix, ".");
    }

    #[test]
    fn missing_profile_is_an_error_naming_it() {
        let (_tmp, path) = write_config("[standard]\nbase_dir = \".\"\n");
        let err = load(&path, "work").unwrap_err();
        assert!(err.to_string().contains("Profile 'work' not found"));
        assert!(err.to_string().contains("standard"));
    }

    #[test]
    fn missing_base_dir_is_an_error() {
        let (_tmp, path) = write_config("[standard]\n");
        let err = load(&path, "standard").unwrap_err();
        assert!(err.to_string().contains("no base_dir"));
    }

    #[test]
    fn delete_alias_accepted_in_config() {
        let (_tmp, path) = write_config(
            "[standard]\nbase_dir = \".\"\nconflicting_file_strategy = \"delete\"\n",
        );
        let settings = load(&path, "standard").unwrap();
        assert_eq!(settings.conflicting_file_strategy, FileStrategy::Replace);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let (_tmp, path) = write_config("[standard]\nbase_dir = \".\"\nbogus = 1\n");
        assert!(load(&path, "standard").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load(&tmp.path().join("nope.toml"), "standard").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
