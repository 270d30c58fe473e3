use std::str::FromStr;

use log::Level;

pub const DEFAULT_LEVEL: Level = Level::Info;

/// Parses a level name such as `"debug"`; unknown names fall back to `info`.
pub fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(DEFAULT_LEVEL)
}

/// Routes `log` output to the browser console and installs the panic hook.
/// Calling it again only keeps the first logger.
#[cfg(target_arch = "wasm32")]
pub fn init(level: Level) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(level).is_err() {
        log::set_max_level(level.to_level_filter());
    }
}

/// Native hosts install their own logger; only the filter is applied here.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: Level) {
    log::set_max_level(level.to_level_filter());
}
