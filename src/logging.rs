//! Tracing subscriber setup for console output.

use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the level is `debug`
/// with `--verbose` and `info` without. Events go to stderr so that
/// `--dump-settings` output on stdout stays machine-readable.
///
/// Calling this more than once is a no-op.
pub fn init_subscriber(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
