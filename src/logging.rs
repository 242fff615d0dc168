//! Logger setup.
//!
//! The crate itself only logs through the `log` facade. Applications that
//! want the crate's output on stderr can call [`init_logger`] once.

use std::io::Write;

use env_logger::{fmt::Formatter, Builder, Target, WriteStyle};
use log::{Level, LevelFilter, Record};

use crate::config::SolverConfig;
use crate::error::{Error, Result};

/// Installs a global stderr logger at the configured `LogLevel`
/// (default `info`).
///
/// Fails if a global logger is already installed.
pub fn init_logger(config: &SolverConfig) -> Result<()> {
    let level = match config.log_level.as_deref() {
        Some(name) => name
            .parse::<LevelFilter>()
            .map_err(|_| Error::config(format!("unknown LogLevel `{name}`")))?,
        None => LevelFilter::Info,
    };

    Builder::new()
        .filter_level(level)
        .write_style(WriteStyle::Never)
        .format(format_record)
        .target(Target::Stderr)
        .try_init()
        .map_err(|e| Error::Logger(e.to_string()))
}

fn format_record(buf: &mut Formatter, record: &Record<'_>) -> std::io::Result<()> {
    writeln!(
        buf,
        "{} [{}] {}",
        level_tag(record.level()),
        record.target(),
        record.args()
    )
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
