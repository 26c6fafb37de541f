// src/utils/logger.rs

//! Minimal `log` backend for binaries and tests that use the crate directly.
//! Libraries embedding the crate can install any other backend instead.

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

use crate::config::LogLevel;

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

/// Installs the stderr backend. Fails if a logger is already set.
pub fn init(level: LogLevel) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::from(level)))
}

/// Changes the level of an installed backend.
pub fn set_level(level: LogLevel) {
  log::set_max_level(LevelFilter::from(level));
}

fn tag(level: Level) -> &'static str {
  match level {
    Level::Error => "ERROR",
    Level::Warn => "WARN ",
    Level::Info => "INFO ",
    Level::Debug => "DEBUG",
    Level::Trace => "TRACE",
  }
}

fn format_record(record: &Record) -> String {
  // Format: "[WARN ] elemprops::config: settings.json unreadable"
  format!("[{}] {}: {}\n", tag(record.level()), record.target(), record.args())
}

impl log::Log for StderrLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let msg = format_record(record);
      let _ = std::io::stderr().lock().write_all(msg.as_bytes());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_record() {
    let line = format_record(
      &Record::builder()
        .args(format_args!("loaded {} rows", 3))
        .level(Level::Warn)
        .target("elemprops::io")
        .build(),
    );
    assert_eq!(line, "[WARN ] elemprops::io: loaded 3 rows\n");
  }

  #[test]
  fn test_level_tags_align() {
    for level in [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace] {
      assert_eq!(tag(level).len(), 5);
    }
  }
}
