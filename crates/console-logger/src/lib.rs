//! Console Logger
//!
//! `log` backend for the browser: every record becomes one timestamped line on
//! the devtools console, routed to `console.error` / `console.warn` /
//! `console.log` by level. Off wasm the lines go to stderr so native tests and
//! tools see the same format.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

struct ConsoleLogger {
    app_name: &'static str,
    level: LevelFilter,
}

/// Install the logger. Fails if another logger is already set.
pub fn init_logger(app_name: &'static str, level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = Box::new(ConsoleLogger { app_name, level });
    log::set_boxed_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// `HH:MM:SS.mmm LEVEL [app] target: message`
pub fn format_line(app_name: &str, record: &Record) -> String {
    format!(
        "{} {:<5} [{}] {}: {}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        record.level(),
        app_name,
        record.target(),
        record.args()
    )
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        write_line(record.level(), &format_line(self.app_name, record));
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_line(level: Level, line: &str) {
    let line = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        Level::Info => web_sys::console::info_1(&line),
        Level::Debug | Level::Trace => web_sys::console::log_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_line(_level: Level, line: &str) {
    eprintln!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let line = format_line(
            "firetodo",
            &Record::builder()
                .level(Level::Warn)
                .target("firetodo_core::sync")
                .args(format_args!("subscription failed"))
                .build(),
        );
        assert!(line.ends_with("WARN  [firetodo] firetodo_core::sync: subscription failed"));
        // HH:MM:SS.mmm prefix
        assert_eq!(line.as_bytes()[2], b':');
        assert_eq!(line.as_bytes()[8], b'.');
    }

    #[test]
    fn test_level_filter() {
        let logger = ConsoleLogger {
            app_name: "firetodo",
            level: LevelFilter::Info,
        };
        assert!(logger.enabled(&Metadata::builder().level(Level::Error).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
    }
}
