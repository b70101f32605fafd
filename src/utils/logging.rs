//! Logger setup

use log::LevelFilter;

/// Install the global logger. `RUST_LOG` overrides the default `info` level.
pub fn init() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
