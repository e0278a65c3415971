//! Stderr logging using env_logger
//!
//! The level follows `--debug` (0 = warn, 1 = info, 2 and above = debug).
//! `RUST_LOG`, when set, takes precedence.

use log::LevelFilter;

fn level_for(debug: u8) -> LevelFilter {
    match debug {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Initialize logging to stderr
pub fn init(debug: u8) {
    env_logger::Builder::new()
        .filter_level(level_for(debug))
        .parse_default_env()
        .format_timestamp_millis()
        .target(env_logger::Target::Stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Debug);
    }
}
