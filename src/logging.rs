//! Debug tracing on stderr.
//!
//! The logger is installed once at `Debug`; `debug on|off` only moves the
//! global max level, so toggling is cheap and never reinstalls anything.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Install the stderr logger. Calling it twice is harmless.
pub fn init(debug: bool, color: bool) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let _ = TermLogger::init(LevelFilter::Debug, config, TerminalMode::Stderr, choice);
    set_debug(debug);
}

/// Switch debug tracing on or off.
pub fn set_debug(on: bool) {
    log::set_max_level(level_for(on));
}

fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_maps_to_levels() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Warn);
    }
}
