//! Logger setup for the `log` facade.

use log::LevelFilter;

/// Install `env_logger` as the global logger.
///
/// `--quiet` shows warnings and errors only; `--verbose` adds debug output
/// and timestamps. `RUST_LOG`, when set, wins over both.
pub(crate) fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_target(false);
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format_timestamp(None);
    }
    builder.parse_default_env();

    if let Err(e) = builder.try_init() {
        eprintln!("Failed to initialize logger: {e}");
    }
}
