//! Forwards `log` records from the shared crate to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: ConsoleLogger = ConsoleLogger;

pub struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record.level(), record.target(), &record.args().to_string());
        match record.level() {
            Level::Error | Level::Warn => zoon::eprintln!("{}", line),
            _ => zoon::println!("{}", line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Calling it twice keeps the first logger.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn format_record(level: Level, target: &str, message: &str) -> String {
    let marker = match level {
        Level::Error => "🚨",
        Level::Warn => "⚠️",
        Level::Info => "ℹ️",
        Level::Debug => "🔍",
        Level::Trace => "·",
    };
    let target = target.rsplit("::").next().unwrap_or(target);
    format!("{marker} [{}] {message}", target.to_uppercase())
}
