// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Stderr backend for the `log` facade.

use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "error".red().bold(),
            Level::Warn => "warn".yellow().bold(),
            Level::Info => "info".green(),
            Level::Debug => "debug".blue(),
            Level::Trace => "trace".dimmed(),
        };
        eprintln!("[{} {}] {}", level, record.target(), record.args());
    }

    fn flush(&self) {}
}

/// Level from `-v` flags, falling back to `ETCH_LOG`, then `warn`.
pub fn level(verbosity: u8, env: Option<&str>) -> LevelFilter {
    match verbosity {
        0 => env
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbosity: u8) {
    let env = std::env::var("ETCH_LOG").ok();
    let level = level(verbosity, env.as_deref());
    // A logger can only be installed once per process.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_beat_environment() {
        assert_eq!(level(0, None), LevelFilter::Warn);
        assert_eq!(level(0, Some("debug")), LevelFilter::Debug);
        assert_eq!(level(0, Some("TRACE")), LevelFilter::Trace);
        assert_eq!(level(0, Some("loud")), LevelFilter::Warn);
        assert_eq!(level(1, Some("error")), LevelFilter::Info);
        assert_eq!(level(2, None), LevelFilter::Debug);
        assert_eq!(level(5, None), LevelFilter::Trace);
    }
}
