//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{FileStrategy, SymlinkStrategy};

/// Keep configuration files under source control in one directory, then
/// symlink them into place.
#[derive(Parser, Debug)]
#[command(
    name = "dfi",
    about = "Conflict-resolving dotfile symlink installer",
    version
)]
pub struct Cli {
    /// Path to the config file to use
    #[arg(
        short = 'f',
        long,
        env = "DFI_CONFIG_FILE",
        default_value = "dfi.toml"
    )]
    pub config_file: PathBuf,

    /// Profile to load from the config file
    #[arg(short, long, env = "DFI_PROFILE", default_value = "standard")]
    pub profile: String,

    /// Override the file-conflict strategy from the config
    #[arg(long, value_enum)]
    pub file_strategy: Option<FileStrategy>,

    /// Override the symlink-conflict strategy from the config
    #[arg(long, value_enum)]
    pub symlink_strategy: Option<SymlinkStrategy>,

    /// Dump the resolved settings as JSON and exit without linking
    #[arg(long)]
    pub dump_settings: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
