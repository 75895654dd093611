//! Binary entry point.

use anyhow::Result;
use clap::Parser;

use dfi::resolve::ResolveOptions;
use dfi::{cli, config, logging, reconcile};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);

    let mut settings = config::file::load(&args.config_file, &args.profile)?;
    if let Some(strategy) = args.file_strategy {
        settings.conflicting_file_strategy = strategy;
    }
    if let Some(strategy) = args.symlink_strategy {
        settings.conflicting_symlink_strategy = strategy;
    }

    if args.dump_settings {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let specs = settings.link_specs()?;
    let opts = ResolveOptions {
        file_strategy: settings.conflicting_file_strategy,
        symlink_strategy: settings.conflicting_symlink_strategy,
        create_missing_target_dirs: settings.create_missing_target_dirs,
    };
    reconcile::reconcile(&specs, &opts)?;
    Ok(())
}
