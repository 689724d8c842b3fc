//! Logging setup: a `log` sink that writes to the browser console on wasm32,
//! `env_logger` on stderr everywhere else.

use log::LevelFilter;

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::JsValue;
    use web_sys::console;

    pub(super) struct ConsoleLogger;

    pub(super) static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let msg = JsValue::from_str(&format!("[{}] {}: {}", record.level(), record.target(), record.args()));
            match record.level() {
                Level::Error => console::error_1(&msg),
                Level::Warn => console::warn_1(&msg),
                _ => console::log_1(&msg),
            }
        }

        fn flush(&self) {}
    }
}

/// Install the console logger. Later calls only adjust the level.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LevelFilter) {
    // already installed on repeat calls
    log::set_logger(&console::LOGGER).ok();
    log::set_max_level(level);
}

/// Install `env_logger` at `level`; `RUST_LOG` takes precedence. A logger that is
/// already installed is kept.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LevelFilter) {
    if env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .is_err()
    {
        log::debug!("logger already installed");
    }
}
