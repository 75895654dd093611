#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Config-file-driven runs: load a profile from `dfi.toml`, build its link
//! specs, and reconcile.

mod common;

use common::Sandbox;
use dfi::config::{FileStrategy, file};
use dfi::reconcile::reconcile;
use dfi::resolve::{ResolutionOutcome, ResolveOptions};

/// A profile with explicit file groups produces links where the config
/// says, with the configured strategies.
#[test]
fn profile_drives_full_run() {
    let sandbox = Sandbox::new();
    sandbox.add_dotfile("bashrc", "from config");

    let config_path = sandbox.settings_dir().join("dfi.toml");
    std::fs::write(
        &config_path,
        "[default]\nconflicting_file_strategy = \"replace\"\n\n\
         [standard]\nbase_dir = \".\"\n\
         file_groups = [{ dirs = [\"dotfiles\"], link_prefix = \".\" }]\n",
    )
    .unwrap();

    let settings = file::load(&config_path, "standard").unwrap();
    assert_eq!(settings.conflicting_file_strategy, FileStrategy::Replace);

    // Obstruct the link path; replace strategy should clear it.
    std::fs::write(sandbox.link_path("bashrc"), "old").unwrap();

    let specs = settings.link_specs().unwrap();
    assert_eq!(specs.len(), 1);

    let opts = ResolveOptions {
        file_strategy: settings.conflicting_file_strategy,
        symlink_strategy: settings.conflicting_symlink_strategy,
        create_missing_target_dirs: settings.create_missing_target_dirs,
    };
    let outcomes = reconcile(&specs, &opts).unwrap();
    assert_eq!(outcomes, vec![ResolutionOutcome::Replaced]);
    assert_eq!(
        std::fs::read(sandbox.link_path("bashrc")).unwrap(),
        b"from config"
    );
}

/// The dedup contract: two groups mapping different sources onto the same
/// link name converge, the first one winning within its group and the
/// reconciler finding the later spec already correct or replacing per
/// strategy.
#[test]
fn config_with_stock_profile_is_idempotent() {
    let sandbox = Sandbox::new();
    sandbox.add_dotfile("bashrc", "x");

    let config_path = sandbox.settings_dir().join("dfi.toml");
    std::fs::write(&config_path, "[standard]\nbase_dir = \".\"\n").unwrap();

    let settings = file::load(&config_path, "standard").unwrap();
    let opts = ResolveOptions::default();

    let first = reconcile(&settings.link_specs().unwrap(), &opts).unwrap();
    assert!(
        first
            .iter()
            .all(|o| matches!(o, ResolutionOutcome::Created))
    );

    let second = reconcile(&settings.link_specs().unwrap(), &opts).unwrap();
    assert!(
        second
            .iter()
            .all(|o| matches!(o, ResolutionOutcome::AlreadyCorrect))
    );
}
